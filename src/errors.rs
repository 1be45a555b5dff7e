//! 统一错误处理
//!
//! 错误类型由宏生成，每个变体带编号和类型名，便于日志归类。

use std::fmt;

/// 生成错误枚举及配套方法：
/// `code()` 错误编号、`error_type()` 类型名、`message()` 详情，
/// 外加 snake_case 的便捷构造函数。
macro_rules! define_gymsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GymSystemError {
            $($variant(String),)*
        }

        impl GymSystemError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(GymSystemError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GymSystemError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(GymSystemError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl GymSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GymSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gymsystem_errors! {
    QueueConnection("E001", "Queue Connection Error"),
    QueuePluginNotFound("E002", "Queue Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Conflict("E006", "Conflict Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    MailDelivery("E010", "Mail Delivery Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
}

impl GymSystemError {
    /// 开发环境下的彩色输出
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GymSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GymSystemError {}

impl From<sea_orm::DbErr> for GymSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        GymSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GymSystemError {
    fn from(err: serde_json::Error) -> Self {
        GymSystemError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for GymSystemError {
    fn from(err: redis::RedisError) -> Self {
        GymSystemError::QueueConnection(err.to_string())
    }
}

impl From<reqwest::Error> for GymSystemError {
    fn from(err: reqwest::Error) -> Self {
        GymSystemError::MailDelivery(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GymSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_constructors_carry_code_and_type() {
        let err = GymSystemError::queue_connection("redis down");
        assert_eq!(err.code(), "E001");
        assert_eq!(err.error_type(), "Queue Connection Error");
        assert_eq!(err.message(), "redis down");

        assert_eq!(GymSystemError::conflict("dup").code(), "E006");
        assert_eq!(GymSystemError::validation("bad").code(), "E007");
        assert_eq!(GymSystemError::mail_delivery("down").code(), "E010");
    }

    #[test]
    fn display_includes_type_and_message() {
        let err = GymSystemError::conflict("Duplicate title");
        let text = err.to_string();
        assert!(text.contains("Conflict Error"));
        assert!(text.contains("Duplicate title"));
    }

    #[test]
    fn db_error_converts_to_database_operation() {
        let err: GymSystemError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
