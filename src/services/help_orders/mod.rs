pub mod answer;
pub mod ask;
pub mod list_for_student;
pub mod list_open;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::help_orders::requests::{AnswerHelpOrderRequest, AskHelpOrderRequest};
use crate::queue::NotifyQueue;
use crate::storage::Storage;

pub struct HelpOrderService {
    storage: Option<Arc<dyn Storage>>,
}

impl HelpOrderService {
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

    // 学员提问
    pub async fn ask_help_order(
        &self,
        student_id: i64,
        ask_data: AskHelpOrderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        ask::ask_help_order(self, student_id, ask_data, request).await
    }

    // 获取学员的全部工单
    pub async fn list_help_orders_for_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_for_student::list_help_orders_for_student(self, student_id, request).await
    }

    // 获取未回复工单列表
    pub async fn list_open_help_orders(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list_open::list_open_help_orders(self, request).await
    }

    // 管理员回复工单
    pub async fn answer_help_order(
        &self,
        help_order_id: i64,
        answer_data: AnswerHelpOrderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        answer::answer_help_order(self, help_order_id, answer_data, request).await
    }
}
