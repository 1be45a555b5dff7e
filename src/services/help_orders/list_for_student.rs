use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HelpOrderService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_help_orders_for_student(
    service: &HelpOrderService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_help_orders_by_student(student_id).await {
        Ok(help_orders) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            help_orders,
            "Help order list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve help order list: {e}"),
            )),
        ),
    }
}
