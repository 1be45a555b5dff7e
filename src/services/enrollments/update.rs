use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{EnrollmentService, term};
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{entities::EnrollmentChanges, requests::UpdateEnrollmentRequest},
};

pub async fn update_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    update_data: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 报名必须存在
    let existing = match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to update enrollment: {e}"),
                )),
            );
        }
    };

    // 2. 换绑学员时校验其存在
    if let Some(student_id) = update_data.student_id {
        match storage.get_student_by_id(student_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::StudentNotFound,
                    "Student not found",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to update enrollment: {e}"),
                    )),
                );
            }
        }
    }

    // 3. 换套餐或改开始日期时重算期限，规则见 term 模块
    let mut changes = EnrollmentChanges {
        student_id: update_data.student_id,
        plan_id: update_data.plan_id,
        start_date: update_data.start_date,
        end_date: None,
        price: None,
    };

    let plan_id_for_term = update_data.plan_id.unwrap_or(existing.plan_id);
    let needs_recompute = update_data.plan_id.is_some() || update_data.start_date.is_some();

    if needs_recompute {
        let plan = match storage.get_plan_by_id(plan_id_for_term).await {
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
                        format!("Failed to update enrollment: {e}"),
                    )),
                );
            }
        };

        match term::recompute_term(
            &plan,
            existing.start_date,
            update_data.start_date,
            update_data.plan_id.is_some(),
        ) {
            Some((end_date, price)) => {
                changes.end_date = Some(end_date);
                changes.price = price;
            }
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "Start date is out of range",
                )));
            }
        }
    }

    match storage.update_enrollment(enrollment_id, changes).await {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => {
            let msg = format!("Failed to update enrollment: {e}");
            error!("{}", msg);
            if msg.contains("FOREIGN KEY constraint failed")
                || msg.contains("foreign key constraint")
            {
                Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "Student does not exist",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}
