use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::declare_notify_queue_plugin;
use crate::errors::Result;
use crate::queue::{NotifyJob, NotifyQueue};

declare_notify_queue_plugin!("redis", RedisNotifyQueue);

/// Redis 列表队列（LPUSH 入队 / BRPOP 出队）
///
/// 任务以 JSON 落在 redis，外部 worker 也可以直接消费同一个 key。
pub struct RedisNotifyQueue {
    client: redis::Client,
    queue_key: String,
}

impl RedisNotifyQueue {
    pub fn new() -> std::result::Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.queue.redis;

        let queue_key = format!("{}notify:jobs", redis_config.key_prefix);
        debug!("RedisNotifyQueue created with key: '{}'", queue_key);

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Failed to create Redis client: {e}"))?;

        // 启动时做一次连通性检查，失败让上层回退到 memory
        match client.get_connection() {
            Ok(mut conn) => match redis::cmd("PING").query::<String>(&mut conn) {
                Ok(response) => {
                    debug!("Redis connection test successful: {}", response);
                }
                Err(e) => {
                    error!(
                        "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                        e, redis_config.url
                    );
                    return Err(format!("Redis ping failed: {e}"));
                }
            },
            Err(e) => {
                error!(
                    "Failed to ping Redis server: {}. Check Redis server status and URL: {}",
                    e, redis_config.url
                );
                return Err(format!("Redis ping failed: {e}"));
            }
        }

        Ok(Self { client, queue_key })
    }

    async fn get_connection(
        &self,
    ) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }
}

#[async_trait]
impl NotifyQueue for RedisNotifyQueue {
    async fn enqueue(&self, job: NotifyJob) -> Result<()> {
        let payload = serde_json::to_string(&job)?;
        let mut conn = self.get_connection().await?;

        conn.lpush::<_, _, ()>(&self.queue_key, payload).await?;
        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<NotifyJob>> {
        let mut conn = self.get_connection().await?;

        // BRPOP 的超时精度是秒，至少阻塞 1 秒
        let timeout_secs = timeout.as_secs_f64().max(1.0);
        let result: Option<(String, String)> = conn.brpop(&self.queue_key, timeout_secs).await?;

        match result {
            Some((_key, payload)) => {
                let job: NotifyJob = serde_json::from_str(&payload)?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }
}
