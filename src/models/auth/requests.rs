use serde::Deserialize;
use ts_rs::TS;

// 管理员登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// 勾选后 refresh token 按更长的有效期签发
    #[serde(default)]
    pub remember_me: bool,
}
