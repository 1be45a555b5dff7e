use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PageQuery;
use crate::services::CheckinService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 CheckinService 实例
static CHECKIN_SERVICE: Lazy<CheckinService> = Lazy::new(CheckinService::new_lazy);

// HTTP处理程序
pub async fn list_checkins(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    CHECKIN_SERVICE
        .list_checkins(student_id.0, query.into_inner(), &req)
        .await
}

pub async fn create_checkin(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CHECKIN_SERVICE.create_checkin(student_id.0, &req).await
}

// 注册路由
pub fn configure_checkins_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students/{student_id}/checkins")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_checkins))
            .route("", web::post().to(create_checkin)),
    );
}
