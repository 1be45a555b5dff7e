use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::HelpOrderService;
use crate::models::{ApiResponse, ErrorCode, help_orders::requests::AnswerHelpOrderRequest};
use crate::queue::NotifyJob;

pub async fn answer_help_order(
    service: &HelpOrderService,
    help_order_id: i64,
    answer_data: AnswerHelpOrderRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 验证回复内容
    if answer_data.answer.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Answer must not be empty",
        )));
    }

    let storage = service.get_storage(request);

    // 先区分「工单不存在」和「已回复」两种失败
    match storage.get_help_order_by_id(help_order_id).await {
        Ok(Some(order)) if order.answer_at.is_some() => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HelpOrderAlreadyAnswered,
                "Help order already answered",
            )));
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HelpOrderNotFound,
                "Help order not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to answer help order: {e}"),
                )),
            );
        }
    }

    // 受保护更新：只有 answer_at 仍为空的工单会被写入
    match storage
        .answer_help_order(help_order_id, answer_data.answer)
        .await
    {
        Ok(Some(answered)) => {
            info!("Help order {} answered", help_order_id);

            // 回复邮件入队，失败只记日志不影响本次请求
            let queue = service.get_queue(request);
            if let Err(e) = queue.enqueue(NotifyJob::AnswerMail(answered.clone())).await {
                error!("回复邮件入队失败: {e}");
            }

            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(answered, "Help order answered successfully")))
        }
        // 预检查之后被并发请求抢先回复
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::HelpOrderAlreadyAnswered,
            "Help order already answered",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to answer help order: {e}"),
            )),
        ),
    }
}
