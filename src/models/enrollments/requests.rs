use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

// 报名创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
}

// 报名更新请求（部分字段，推导规则见服务层）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub student_id: Option<i64>,
    pub plan_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
}
