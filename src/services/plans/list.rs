use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_plans(service: &PlanService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_plans().await {
        Ok(plans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            plans,
            "Plan list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve plan list: {e}"),
            )),
        ),
    }
}
