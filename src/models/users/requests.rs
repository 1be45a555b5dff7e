use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求（仅用于初始管理员播种与内部创建）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}
