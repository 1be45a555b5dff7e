use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CheckinService;
use crate::models::{ApiResponse, ErrorCode, checkins::entities::CheckinOutcome};

pub async fn create_checkin(
    service: &CheckinService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 准入判定与落库在存储层同一把学员锁内完成
    match storage.record_checkin(student_id).await {
        Ok(CheckinOutcome::Recorded(checkin)) => {
            info!("Checkin {} recorded for student {}", checkin.id, student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Checkin recorded successfully")))
        }
        Ok(CheckinOutcome::NoActiveEnrollment) => {
            Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::NoActiveEnrollment,
                "There is no active enrollment",
            )))
        }
        Ok(CheckinOutcome::LimitReached) => {
            Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::CheckinLimitReached,
                "User has reached checkins limit",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Checkin failed: {e}"),
            )),
        ),
    }
}
