pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::plans::requests::{CreatePlanRequest, UpdatePlanRequest};
use crate::storage::Storage;

pub struct PlanService {
    storage: Option<Arc<dyn Storage>>,
}

impl PlanService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取套餐列表
    pub async fn list_plans(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_plans(self, request).await
    }

    // 创建套餐
    pub async fn create_plan(
        &self,
        plan_data: CreatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_plan(self, plan_data, request).await
    }

    // 更新套餐信息
    pub async fn update_plan(
        &self,
        plan_id: i64,
        update_data: UpdatePlanRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_plan(self, plan_id, update_data, request).await
    }

    // 删除套餐
    pub async fn delete_plan(
        &self,
        plan_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_plan(self, plan_id, request).await
    }
}
