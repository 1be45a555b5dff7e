//! 业务模型定义
//!
//! 按领域拆分：每个领域下分 entities / requests / responses。
//! common 中是跨领域的响应封装与分页结构。

pub mod auth;
pub mod checkins;
pub mod common;
pub mod enrollments;
pub mod help_orders;
pub mod plans;
pub mod students;
pub mod users;

pub use common::pagination::{PAGE_SIZE, PageQuery, PaginationInfo};
pub use common::response::ApiResponse;

/// 业务错误码
///
/// 与 HTTP 状态码对齐，细分错误追加一位子码，前端按码分支处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 200,

    BadRequest = 400,
    ValidationFailed = 4001,

    Unauthorized = 401,
    AuthFailed = 4011,
    TokenExpired = 4012,
    NoActiveEnrollment = 4013,
    CheckinLimitReached = 4014,

    Forbidden = 403,
    NotAdministrator = 4031,

    NotFound = 404,
    PlanNotFound = 4041,
    StudentNotFound = 4042,
    EnrollmentNotFound = 4043,
    HelpOrderNotFound = 4044,

    Conflict = 409,
    PlanAlreadyExists = 4091,
    StudentAlreadyExists = 4092,
    EnrollmentConflict = 4093,
    HelpOrderAlreadyAnswered = 4094,
    PlanInUse = 4095,

    RateLimitExceeded = 429,
    InternalServerError = 500,
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 200);
        assert_eq!(ErrorCode::EnrollmentConflict as i32, 4093);
        assert_eq!(ErrorCode::NoActiveEnrollment as i32, 4013);
        assert_eq!(ErrorCode::RateLimitExceeded as i32, 429);
    }
}
