use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Checkin;
use crate::models::common::PaginationInfo;
use crate::models::students::responses::StudentSummary;

// 带学员摘要的打卡列表项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/checkin.ts")]
pub struct CheckinListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub checkin: Checkin,
    pub student: Option<StudentSummary>,
}

// 打卡列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/checkin.ts")]
pub struct CheckinListResponse {
    pub items: Vec<CheckinListItem>,
    pub pagination: PaginationInfo,
}
