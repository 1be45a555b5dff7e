//! 安全路径参数提取器
//!
//! 解析失败时直接返回统一响应格式的 400，而不是 actix 默认的纯文本错误。

use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_id_extractor {
    ($name:ident, $param:literal) => {
        /// 从路径参数中提取正整数 ID
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|v| v.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => {
                        let response = HttpResponse::BadRequest().json(
                            ApiResponse::<()>::error_empty(
                                ErrorCode::BadRequest,
                                "Data validation failed",
                            ),
                        );
                        Err(InternalError::from_response(
                            format!("invalid path parameter `{}`", $param),
                            response,
                        )
                        .into())
                    }
                })
            }
        }
    };
}

define_id_extractor!(SafeIDI64, "id");
define_id_extractor!(SafeStudentIdI64, "student_id");
