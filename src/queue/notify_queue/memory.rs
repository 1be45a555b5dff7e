use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::config::AppConfig;
use crate::declare_notify_queue_plugin;
use crate::errors::{GymSystemError, Result};
use crate::queue::{NotifyJob, NotifyQueue};

declare_notify_queue_plugin!("memory", MemoryNotifyQueue);

/// 进程内有界队列，进程退出时未消费的任务随之丢失
pub struct MemoryNotifyQueue {
    tx: mpsc::Sender<NotifyJob>,
    rx: Mutex<mpsc::Receiver<NotifyJob>>,
}

impl MemoryNotifyQueue {
    pub fn new() -> std::result::Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(config.queue.capacity))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);

        debug!("MemoryNotifyQueue initialized with capacity: {}", capacity);

        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

#[async_trait]
impl NotifyQueue for MemoryNotifyQueue {
    async fn enqueue(&self, job: NotifyJob) -> Result<()> {
        // 有界队列满时直接失败，由调用方记录日志（不阻塞请求路径）
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                GymSystemError::queue_connection("内存队列已满，任务被丢弃")
            }
            mpsc::error::TrySendError::Closed(_) => {
                GymSystemError::queue_connection("内存队列已关闭")
            }
        })
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<NotifyJob>> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(job)) => Ok(Some(job)),
            Ok(None) => Err(GymSystemError::queue_connection("内存队列已关闭")),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::help_orders::{entities::HelpOrder, responses::HelpOrderWithStudent};
    use crate::models::students::responses::StudentSummary;
    use chrono::Utc;

    fn sample_job(question: &str) -> NotifyJob {
        NotifyJob::AnswerMail(HelpOrderWithStudent {
            help_order: HelpOrder {
                id: 1,
                student_id: 1,
                question: question.to_string(),
                answer: Some("Resposta".to_string()),
                answer_at: Some(Utc::now()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            student: Some(StudentSummary {
                name: "Ana Souza".to_string(),
                email: "ana@gym.test".to_string(),
            }),
        })
    }

    fn question_of(job: &NotifyJob) -> String {
        match job {
            NotifyJob::AnswerMail(order) => order.help_order.question.clone(),
            other => panic!("unexpected job kind: {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn fifo_order() {
        let queue = MemoryNotifyQueue::with_capacity(8);

        queue.enqueue(sample_job("first")).await.unwrap();
        queue.enqueue(sample_job("second")).await.unwrap();

        let first = queue
            .dequeue(Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();
        let second = queue
            .dequeue(Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(question_of(&first), "first");
        assert_eq!(question_of(&second), "second");
    }

    #[tokio::test]
    async fn dequeue_times_out_when_empty() {
        let queue = MemoryNotifyQueue::with_capacity(8);

        let result = queue.dequeue(Duration::from_millis(20)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn enqueue_fails_when_full() {
        let queue = MemoryNotifyQueue::with_capacity(1);

        queue.enqueue(sample_job("first")).await.unwrap();
        let err = queue.enqueue(sample_job("second")).await.unwrap_err();
        assert!(matches!(err, GymSystemError::QueueConnection(_)));
    }
}
