use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::help_orders::requests::{AnswerHelpOrderRequest, AskHelpOrderRequest};
use crate::services::HelpOrderService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 HelpOrderService 实例
static HELP_ORDER_SERVICE: Lazy<HelpOrderService> = Lazy::new(HelpOrderService::new_lazy);

// HTTP处理程序
pub async fn ask_help_order(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    ask_data: web::Json<AskHelpOrderRequest>,
) -> ActixResult<HttpResponse> {
    HELP_ORDER_SERVICE
        .ask_help_order(student_id.0, ask_data.into_inner(), &req)
        .await
}

pub async fn list_help_orders_for_student(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    HELP_ORDER_SERVICE
        .list_help_orders_for_student(student_id.0, &req)
        .await
}

pub async fn list_open_help_orders(req: HttpRequest) -> ActixResult<HttpResponse> {
    HELP_ORDER_SERVICE.list_open_help_orders(&req).await
}

pub async fn answer_help_order(
    req: HttpRequest,
    help_order_id: SafeIDI64,
    answer_data: web::Json<AnswerHelpOrderRequest>,
) -> ActixResult<HttpResponse> {
    HELP_ORDER_SERVICE
        .answer_help_order(help_order_id.0, answer_data.into_inner(), &req)
        .await
}

// 注册路由
//
// 学员子路径（提问/查询自己的工单）先于学员路由注册；
// /api/v1/help-orders 下是管理员的待回复队列与回复操作。
pub fn configure_help_orders_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students/{student_id}/help-orders")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_help_orders_for_student))
            .route("", web::post().to(ask_help_order)),
    );

    cfg.service(
        web::scope("/api/v1/help-orders")
            .wrap(middlewares::RequireAdmin)
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_open_help_orders))
            .route("/{id}/answer", web::put().to(answer_help_order)),
    );
}
