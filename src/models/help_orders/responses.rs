use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::HelpOrder;
use crate::models::students::responses::StudentSummary;

// 带学员摘要的工单（回复响应与通知任务载荷复用）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/help_order.ts")]
pub struct HelpOrderWithStudent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub help_order: HelpOrder,
    pub student: Option<StudentSummary>,
}
