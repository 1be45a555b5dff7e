use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 嵌套在报名里的套餐摘要
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/plan.ts")]
pub struct PlanSummary {
    pub title: String,
    pub duration: i32,
    #[ts(type = "string")]
    pub price: Decimal,
}
