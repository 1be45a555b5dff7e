use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::HelpOrderService;
use crate::models::{ApiResponse, ErrorCode, help_orders::requests::AskHelpOrderRequest};

pub async fn ask_help_order(
    service: &HelpOrderService,
    student_id: i64,
    ask_data: AskHelpOrderRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证问题内容
    if ask_data.question.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Question must not be empty",
        )));
    }

    let storage = service.get_storage(request);

    match storage
        .create_help_order(student_id, ask_data.question)
        .await
    {
        Ok(help_order) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(help_order, "Help order created successfully"))),
        Err(e) => {
            let msg = format!("Help order creation failed: {e}");
            error!("{}", msg);
            // 学员不存在时外键约束拒绝落库
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
