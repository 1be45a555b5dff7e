use crate::mailer::Mailer;
use crate::models::users::requests::CreateUserRequest;
use crate::queue::NotifyQueue;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub queue: Arc<dyn NotifyQueue>,
    pub worker: tokio::task::JoinHandle<()>,
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    use rand::distr::Alphanumeric;
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 空库时补一个默认管理员，否则后台无法登录
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found in database, creating default admin account..."),
        Ok(count) => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 未设置 ADMIN_PASSWORD 时生成一次性随机密码并打印
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(20);
        warn!("----------------------------------------------------------");
        warn!("  ADMIN_PASSWORD not set, generated one-time password:");
        warn!("  admin@localhost / {}", pwd);
        warn!("  Store it now, it will not be shown again");
        warn!("----------------------------------------------------------");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        name: "Administrator".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        is_admin: true,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 启动前置：存储、默认管理员、通知队列、邮件 worker
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::queue::register::debug_notify_queue_registry();
        debug!("Debug mode: Queue registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    // redis 不可用时 create_queue 内部回退到 memory
    let queue = crate::queue::create_queue()
        .await
        .expect("Failed to create notify queue");
    warn!("Notify queue backend initialized");

    let mailer = Arc::new(Mailer::from_config().expect("Failed to create mailer"));
    let worker = crate::queue::worker::spawn_worker(queue.clone(), mailer);
    warn!("Notification worker started");

    StartupContext {
        storage,
        queue,
        worker,
    }
}
