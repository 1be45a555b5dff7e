use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 套餐实体
//
// price 为月单价，Decimal 序列化为字符串（如 "129.90"），避免浮点误差。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/plan.ts")]
pub struct Plan {
    pub id: i64,
    pub title: String,
    /// 时长（月）
    pub duration: i32,
    #[ts(type = "string")]
    pub price: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
