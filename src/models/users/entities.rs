use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::utils::jwt::{JwtUtils, TokenPair};

// 后台管理员账号，is_admin 为唯一权限位
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不回显到 JSON 响应
    #[ts(skip)]
    pub password_hash: String,
    pub is_admin: bool,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 签发访问/刷新令牌对，refresh_token_expiry 传 None 用配置默认值
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, String> {
        JwtUtils::generate_token_pair(self.id, self.is_admin, refresh_token_expiry)
            .map_err(|e| format!("Failed to generate token pair: {e}"))
    }
}
