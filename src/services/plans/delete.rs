use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::PlanService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_plan(
    service: &PlanService,
    plan_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_plan(plan_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Plan deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PlanNotFound,
            "Plan not found",
        ))),
        Err(e) => {
            let msg = format!("Plan deletion failed: {e}");
            error!("{}", msg);
            // 套餐仍被报名引用时数据库会以外键约束拒绝删除
            if msg.contains("FOREIGN KEY constraint failed")
                || msg.contains("foreign key constraint")
            {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::PlanInUse,
                    "Plan is still referenced by enrollments",
                )))
            } else {
                Ok(HttpResponse::InternalServerError()
                    .json(ApiResponse::error_empty(ErrorCode::InternalServerError, msg)))
            }
        }
    }
}
