pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PageQuery;
use crate::storage::Storage;

pub struct CheckinService {
    storage: Option<Arc<dyn Storage>>,
}

impl CheckinService {
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

    // 获取学员打卡记录
    pub async fn list_checkins(
        &self,
        student_id: i64,
        query: PageQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_checkins(self, student_id, query, request).await
    }

    // 学员打卡
    pub async fn create_checkin(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_checkin(self, student_id, request).await
    }
}
