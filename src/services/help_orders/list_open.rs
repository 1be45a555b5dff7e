use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HelpOrderService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_open_help_orders(
    service: &HelpOrderService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_open_help_orders().await {
        Ok(help_orders) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            help_orders,
            "Open help order list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve open help order list: {e}"),
            )),
        ),
    }
}
