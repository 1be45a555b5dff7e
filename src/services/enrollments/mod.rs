pub mod create;
pub mod delete;
pub mod list;
mod term;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PageQuery;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, UpdateEnrollmentRequest};
use crate::queue::NotifyQueue;
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
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

    pub(crate) fn get_queue(&self, request: &HttpRequest) -> Arc<dyn NotifyQueue> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn NotifyQueue>>>()
            .expect("Notify queue not found in app data")
            .get_ref()
            .clone()
    }

    // 获取报名列表
    pub async fn list_enrollments(
        &self,
        query: PageQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    // 创建报名
    pub async fn create_enrollment(
        &self,
        enrollment_data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, enrollment_data, request).await
    }

    // 更新报名信息
    pub async fn update_enrollment(
        &self,
        enrollment_id: i64,
        update_data: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment(self, enrollment_id, update_data, request).await
    }

    // 删除报名
    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }
}
