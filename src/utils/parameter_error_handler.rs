//! 请求参数错误处理
//!
//! JSON 请求体 / Query 参数反序列化失败时改写为统一响应格式。

use actix_web::{HttpRequest, HttpResponse, error};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    tracing::warn!("JSON 请求体解析失败: {err}");
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::ValidationFailed,
        "Data validation failed",
    ));
    error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    tracing::warn!("Query 参数解析失败: {err}");
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::ValidationFailed,
        "Data validation failed",
    ));
    error::InternalError::from_response(err, response).into()
}
