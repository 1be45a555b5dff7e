use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CheckinService;
use crate::models::{ApiResponse, ErrorCode, PageQuery};

pub async fn list_checkins(
    service: &CheckinService,
    student_id: i64,
    query: PageQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_checkins_with_pagination(student_id, query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Checkin list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve checkin list: {e}"),
            )),
        ),
    }
}
