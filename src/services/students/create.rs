use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode, students::requests::CreateStudentRequest};
use crate::utils::validate::{validate_birthdate, validate_email, validate_height, validate_weight};

pub async fn create_student(
    service: &StudentService,
    student_data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证姓名
    if student_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Name must not be empty",
        )));
    }

    // 验证邮箱
    if let Err(msg) = validate_email(&student_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 验证出生日期
    if let Err(msg) = validate_birthdate(student_data.birthdate) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 验证体重与身高
    if let Err(msg) = validate_weight(student_data.weight) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if let Err(msg) = validate_height(student_data.height) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    // 邮箱查重
    match storage.get_student_by_email(&student_data.email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::StudentAlreadyExists,
                "Student already registered",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Student creation failed: {e}"),
                )),
            );
        }
    }

    match storage.create_student(student_data).await {
        Ok(student) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(student, "Student created successfully"))),
        Err(e) => {
            let msg = format!("Student creation failed: {e}");
            error!("{}", msg);
            // 判断是否唯一约束冲突（并发创建时预检查可能漏网）
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
