use serde::Deserialize;
use ts_rs::TS;

// 学员提问请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/help_order.ts")]
pub struct AskHelpOrderRequest {
    pub question: String,
}

// 管理员回复请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/help_order.ts")]
pub struct AnswerHelpOrderRequest {
    pub answer: String,
}
