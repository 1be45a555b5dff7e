use serde::{Deserialize, Serialize};

/// 应用配置，config.example.toml 给出全部默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub mail: MailConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    /// development | production
    pub environment: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 非空时用 Unix 套接字替代 TCP 监听
    pub unix_socket_path: String,
    /// 0 表示按 CPU 核数取值
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// 毫秒
    pub client_request: u64,
    /// 毫秒
    pub client_disconnect: u64,
    /// 秒
    pub keep_alive: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// 请求体上限（字节）
    pub max_payload_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不回显到任何 JSON 输出
    pub secret: String,
    /// 分钟
    pub access_token_expiry: i64,
    /// 天
    pub refresh_token_expiry: i64,
    /// 勾选记住我时的刷新令牌有效期（天）
    pub refresh_token_remember_me_expiry: i64,
}

/// Argon2 密码哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 连接 URL，数据库类型从 scheme 推断
    pub url: String,
    pub pool_size: u32,
    /// 连接超时（秒）
    pub timeout: u64,
}

/// 通知队列配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(rename = "type")]
    pub queue_type: String,
    /// 内存队列容量（条）
    pub capacity: usize,
    /// 消费端空轮询间隔（秒）
    pub poll_interval: u64,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
}

/// 邮件投递配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// 邮件网关地址，留空则只记录日志（开发模式）
    pub endpoint: String,
    pub from: String,
    /// 投递请求超时（秒）
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 含 "*" 时对所有来源放开
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// 预检缓存时长（秒）
    pub max_age: usize,
}
