use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode, plans::requests::CreatePlanRequest};
use crate::utils::validate::{validate_duration, validate_price};

pub async fn create_plan(
    service: &PlanService,
    plan_data: CreatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证标题
    if plan_data.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title must not be empty",
        )));
    }

    // 验证时长
    if let Err(msg) = validate_duration(plan_data.duration) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 验证单价
    if let Err(msg) = validate_price(plan_data.price) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    // 标题查重
    match storage.get_plan_by_title(&plan_data.title).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::PlanAlreadyExists,
                "Plan already registered",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Plan creation failed: {e}"),
                )),
            );
        }
    }

    match storage.create_plan(plan_data).await {
        Ok(plan) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(plan, "Plan created successfully"))),
        Err(e) => {
            let msg = format!("Plan creation failed: {e}");
            error!("{}", msg);
            // 判断是否唯一约束冲突（并发创建时预检查可能漏网）
            if msg.contains("UNIQUE constraint failed") {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::PlanAlreadyExists,
                    "Plan already registered",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}
