use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报名实体
//
// end_date 与 price 在创建/更新时由套餐推导后落库，
// 之后修改套餐不会回溯重算已有报名。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 总价 = 套餐月单价 × 时长
    #[ts(type = "string")]
    pub price: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的完整报名记录（推导字段已算好，存储层只负责原子落库）
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
}

// 报名更新的落库变更集（服务层已完成推导）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentChanges {
    pub student_id: Option<i64>,
    pub plan_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub price: Option<Decimal>,
}
