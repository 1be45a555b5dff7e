use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 三层叠加：config.toml、config.{APP_ENV}.toml、环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_ENV").ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    profile.as_deref().unwrap_or("development")
                ))
                .required(false),
            )
            .add_source(
                Environment::with_prefix("GYMSYSTEM")
                    .separator("_")
                    .try_parsing(true),
            )
            // 常用变量不带前缀也能覆盖
            .set_override_option("app.environment", profile)?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("queue.type", std::env::var("QUEUE_TYPE").ok())?
            .set_override_option("queue.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "queue.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("mail.endpoint", std::env::var("MAIL_ENDPOINT").ok())?
            .set_override_option("mail.from", std::env::var("MAIL_FROM").ok())?
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // workers 为 0 时按 CPU 核数取值
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 应用启动时调用一次
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 配置了 Unix 套接字时返回其路径
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}
