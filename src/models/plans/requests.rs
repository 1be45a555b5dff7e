use rust_decimal::Decimal;
use serde::Deserialize;
use ts_rs::TS;

// 套餐创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/plan.ts")]
pub struct CreatePlanRequest {
    pub title: String,
    pub duration: i32,
    #[ts(type = "string")]
    pub price: Decimal,
}

// 套餐更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/plan.ts")]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub duration: Option<i32>,
    #[ts(type = "string | null")]
    pub price: Option<Decimal>,
}
