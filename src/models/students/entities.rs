use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学员实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// 出生日期（YYYY-MM-DD）
    pub birthdate: NaiveDate,
    /// 体重（kg）
    pub weight: f64,
    /// 身高（m）
    pub height: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
