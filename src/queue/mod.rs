//! 通知队列模块
//!
//! 核心操作只负责入队（fire-and-forget），由 worker 统一消费并投递邮件。
//! 后端通过 ctor 注册表插件化，支持 memory 与 redis 两种实现。

pub mod jobs;
pub mod notify_queue;
pub mod register;
pub mod worker;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::{GymSystemError, Result};

pub use jobs::NotifyJob;

/// 通知队列后端抽象
#[async_trait]
pub trait NotifyQueue: Send + Sync {
    /// 入队一个通知任务
    async fn enqueue(&self, job: NotifyJob) -> Result<()>;

    /// 取出下一个任务，超时返回 None
    async fn dequeue(&self, timeout: Duration) -> Result<Option<NotifyJob>>;
}

/// 声明通知队列插件的宏
///
/// 在程序启动前（ctor 阶段）把后端构造函数注册进插件表。
#[macro_export]
macro_rules! declare_notify_queue_plugin {
    ($name:expr, $backend:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_notify_queue_plugin_ $backend:snake>]() {
                let constructor: $crate::queue::register::NotifyQueueConstructor =
                    std::sync::Arc::new(
                        || -> $crate::queue::register::BoxedNotifyQueueFuture {
                            Box::pin(async {
                                let queue = $backend::new()
                                    .map_err($crate::errors::GymSystemError::queue_connection)?;
                                Ok(Box::new(queue) as Box<dyn $crate::queue::NotifyQueue>)
                            })
                        },
                    );
                $crate::queue::register::register_notify_queue_plugin($name, constructor);
            }
        }
    };
}

/// 按配置创建通知队列，redis 不可用时回退到 memory
pub async fn create_queue() -> Result<Arc<dyn NotifyQueue>> {
    let config = AppConfig::get();
    let requested = config.queue.queue_type.as_str();

    match build_backend(requested).await {
        Ok(queue) => {
            info!("通知队列后端已就绪: {}", requested);
            Ok(queue)
        }
        Err(e) if requested != "memory" => {
            warn!("通知队列后端 {requested} 初始化失败，回退到 memory: {e}");
            let queue = build_backend("memory").await?;
            info!("通知队列后端已就绪: memory (fallback)");
            Ok(queue)
        }
        Err(e) => Err(e),
    }
}

async fn build_backend(name: &str) -> Result<Arc<dyn NotifyQueue>> {
    let constructor = register::get_notify_queue_plugin(name)
        .ok_or_else(|| GymSystemError::queue_plugin_not_found(format!("未知的队列类型: {name}")))?;

    let queue = constructor().await?;
    Ok(Arc::from(queue))
}
