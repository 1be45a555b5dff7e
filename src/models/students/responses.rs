use super::entities::Student;
use crate::models::common::PaginationInfo;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学员列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

// 嵌套在报名、打卡、工单里的学员摘要
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentSummary {
    pub name: String,
    pub email: String,
}
