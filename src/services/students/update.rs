use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::requests::UpdateStudentRequest};
use crate::utils::validate::{validate_birthdate, validate_email, validate_height, validate_weight};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update_data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证提供的字段
    if let Some(name) = &update_data.name
        && name.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Name must not be empty",
        )));
    }

    if let Some(email) = &update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Some(birthdate) = update_data.birthdate
        && let Err(msg) = validate_birthdate(birthdate)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Some(weight) = update_data.weight
        && let Err(msg) = validate_weight(weight)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    if let Some(height) = update_data.height
        && let Err(msg) = validate_height(height)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.update_student(student_id, update_data).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student information updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => {
            let msg = format!("Failed to update student information: {e}");
            error!("{}", msg);
            // 换绑邮箱撞上唯一约束
            if msg.contains("UNIQUE constraint failed") {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::StudentAlreadyExists,
                    "Student already registered",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}
