use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 求助工单实体
//
// answer_at 非空即已回复，之后不可再改（一次性状态迁移）。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/help_order.ts")]
pub struct HelpOrder {
    pub id: i64,
    pub student_id: i64,
    pub question: String,
    pub answer: Option<String>,
    pub answer_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
