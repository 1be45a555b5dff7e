use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PageQuery;

// 学员查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PageQuery,
    /// 按姓名模糊搜索
    pub q: Option<String>,
}

// 学员创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub birthdate: NaiveDate,
    pub weight: f64,
    pub height: f64,
}

// 学员更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}
