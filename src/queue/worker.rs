//! 通知队列 worker
//!
//! 启动时派生的长驻任务，循环消费队列并投递邮件。
//! 单个任务失败只记录日志，worker 本身不退出（at-most-once 投递）。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::AppConfig;
use crate::mailer::Mailer;
use crate::queue::{NotifyJob, NotifyQueue};

/// 启动后台 worker
pub fn spawn_worker(
    queue: Arc<dyn NotifyQueue>,
    mailer: Arc<Mailer>,
) -> tokio::task::JoinHandle<()> {
    let poll = Duration::from_secs(AppConfig::get().queue.poll_interval.max(1));

    tokio::spawn(async move {
        info!("通知 worker 已启动, poll 间隔 {:?}", poll);
        loop {
            match queue.dequeue(poll).await {
                Ok(Some(job)) => deliver(&mailer, job).await,
                // 空轮询，继续等待
                Ok(None) => {}
                Err(e) => {
                    error!("通知队列消费失败: {e}");
                    tokio::time::sleep(poll).await;
                }
            }
        }
    })
}

async fn deliver(mailer: &Mailer, job: NotifyJob) {
    let kind = job.kind();
    let mail = match job.into_mail() {
        Ok(mail) => mail,
        Err(e) => {
            error!("通知任务载荷不完整，跳过: {kind}: {e}");
            return;
        }
    };

    let to = mail.to.clone();
    match mailer.send(mail).await {
        Ok(()) => info!("通知邮件已投递: {kind} -> {to}"),
        Err(e) => error!("通知邮件投递失败: {kind} -> {to}: {e}"),
    }
}
