use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{EnrollmentService, term};
use crate::errors::GymSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{
        entities::NewEnrollment, requests::CreateEnrollmentRequest, responses::EnrollmentListItem,
    },
    plans::responses::PlanSummary,
    students::responses::StudentSummary,
};
use crate::queue::NotifyJob;

pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 学员必须存在（摘要同时用于确认邮件）
    let student = match storage.get_student_by_id(enrollment_data.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Student does not exist",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Enrollment creation failed: {e}"),
                )),
            );
        }
    };

    // 2. 套餐必须存在
    let plan = match storage.get_plan_by_id(enrollment_data.plan_id).await {
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
                    format!("Enrollment creation failed: {e}"),
                )),
            );
        }
    };

    // 3. 重叠预检查（快速失败，锁内还会复查一次）
    match storage
        .find_blocking_enrollment(enrollment_data.student_id, enrollment_data.start_date)
        .await
    {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentConflict,
                "The student still has an active enrollment on this start date.",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Enrollment creation failed: {e}"),
                )),
            );
        }
    }

    // 4. 从套餐推导结束日期与总价
    let end_date = match term::end_date_for(&plan, enrollment_data.start_date) {
        Some(date) => date,
        None => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Start date is out of range",
            )));
        }
    };
    let price = term::total_price(&plan);

    let new_enrollment = NewEnrollment {
        student_id: enrollment_data.student_id,
        plan_id: enrollment_data.plan_id,
        start_date: enrollment_data.start_date,
        end_date,
        price,
    };

    // 5. 学员锁内复查重叠并落库
    match storage.create_enrollment(new_enrollment).await {
        Ok(enrollment) => {
            info!(
                "Enrollment {} created for student {} (plan {})",
                enrollment.id, enrollment.student_id, enrollment.plan_id
            );

            let item = EnrollmentListItem {
                enrollment,
                student: Some(StudentSummary {
                    name: student.name,
                    email: student.email,
                }),
                plan: Some(PlanSummary {
                    title: plan.title,
                    duration: plan.duration,
                    price: plan.price,
                }),
            };

            // 6. 确认邮件入队，失败只记日志不影响本次请求
            let queue = service.get_queue(request);
            if let Err(e) = queue.enqueue(NotifyJob::ConfirmationMail(item.clone())).await {
                error!("确认邮件入队失败: {e}");
            }

            Ok(HttpResponse::Created()
                .json(ApiResponse::success(item, "Enrollment created successfully")))
        }
        Err(GymSystemError::Conflict(_)) => {
            // 锁内复查发现并发请求已抢先占用该时段
            Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentConflict,
                "The student still has an active enrollment on this start date.",
            )))
        }
        Err(e) => {
            let msg = format!("Enrollment creation failed: {e}");
            error!("{}", msg);
            // 学员在预检查后被删除时外键约束兜底
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
