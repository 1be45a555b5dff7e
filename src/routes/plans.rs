use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::plans::requests::{CreatePlanRequest, UpdatePlanRequest};
use crate::services::PlanService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PlanService 实例
static PLAN_SERVICE: Lazy<PlanService> = Lazy::new(PlanService::new_lazy);

// HTTP处理程序
pub async fn list_plans(req: HttpRequest) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.list_plans(&req).await
}

pub async fn create_plan(
    req: HttpRequest,
    plan_data: web::Json<CreatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.create_plan(plan_data.into_inner(), &req).await
}

pub async fn update_plan(
    req: HttpRequest,
    plan_id: SafeIDI64,
    update_data: web::Json<UpdatePlanRequest>,
) -> ActixResult<HttpResponse> {
    PLAN_SERVICE
        .update_plan(plan_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_plan(req: HttpRequest, plan_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PLAN_SERVICE.delete_plan(plan_id.0, &req).await
}

// 注册路由
pub fn configure_plans_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/plans")
            .wrap(middlewares::RequireJWT)
            // 套餐列表对所有已认证用户开放
            .route("", web::get().to(list_plans))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireAdmin)
                    .route("", web::post().to(create_plan))
                    .route("/{id}", web::put().to(update_plan))
                    .route("/{id}", web::delete().to(delete_plan)),
            ),
    );
}
