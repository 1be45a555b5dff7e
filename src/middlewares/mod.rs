//! HTTP 中间件
//!
//! - `RequireJWT`：验证访问令牌并把用户写入请求扩展
//! - `RequireAdmin`：校验管理员标记，必须在 RequireJWT 之后使用
//! - `RateLimit`：基于 moka 的请求频率限制

pub mod rate_limit;
pub mod require_admin;
pub mod require_jwt;

pub use rate_limit::RateLimit;
pub use require_admin::RequireAdmin;
pub use require_jwt::RequireJWT;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ApiResponse, ErrorCode};

// 辅助函数：创建统一格式的中间件错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}
