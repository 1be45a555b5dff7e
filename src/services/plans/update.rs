use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode, plans::requests::UpdatePlanRequest};
use crate::utils::validate::{validate_duration, validate_price};

pub async fn update_plan(
    service: &PlanService,
    plan_id: i64,
    update_data: UpdatePlanRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证提供的字段
    if let Some(title) = &update_data.title
        && title.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Title must not be empty",
        )));
    }

    if let Some(duration) = update_data.duration
        && let Err(msg) = validate_duration(duration)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Some(price) = update_data.price
        && let Err(msg) = validate_price(price)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    let existing = match storage.get_plan_by_id(plan_id).await {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PlanNotFound,
                "Plan not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update plan: {e}"),
                )),
            );
        }
    };

    // 标题变化时才重新查重
    if let Some(title) = &update_data.title
        && *title != existing.title
    {
        match storage.get_plan_by_title(title).await {
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
                        format!("Failed to update plan: {e}"),
                    )),
                );
            }
        }
    }

    match storage.update_plan(plan_id, update_data).await {
        Ok(Some(plan)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(plan, "Plan updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PlanNotFound,
            "Plan not found",
        ))),
        Err(e) => {
            let msg = format!("Failed to update plan: {e}");
            error!("{}", msg);
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
