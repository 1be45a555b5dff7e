use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Enrollment;
use crate::models::common::PaginationInfo;
use crate::models::plans::responses::PlanSummary;
use crate::models::students::responses::StudentSummary;

// 带学员/套餐摘要的报名列表项
//
// student / plan 为 None 表示关联记录已不存在（如学员被删除）。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub enrollment: Enrollment,
    pub student: Option<StudentSummary>,
    pub plan: Option<PlanSummary>,
}

// 报名列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentListItem>,
    pub pagination: PaginationInfo,
}
