use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

const REFRESH_COOKIE: &str = "refresh_token";

/// 令牌种类，序列化为 "access" / "refresh"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub is_admin: bool,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 签发令牌，过期时间由调用方给定
    fn issue(
        user_id: i64,
        is_admin: bool,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            is_admin,
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(Self::get_secret().as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    pub fn generate_access_token(
        user_id: i64,
        is_admin: bool,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        Self::issue(user_id, is_admin, TokenKind::Access, ttl)
    }

    /// 过期时间传 None 时使用配置里的默认天数
    pub fn generate_refresh_token(
        user_id: i64,
        is_admin: bool,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = token_expiry
            .unwrap_or_else(|| chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry));
        Self::issue(user_id, is_admin, TokenKind::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        is_admin: bool,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, is_admin)?,
            refresh_token: Self::generate_refresh_token(user_id, is_admin, refresh_token_expiry)?,
        })
    }

    // 验签并校验令牌种类
    fn verify(token: &str, kind: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(Self::get_secret().as_ref());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::default())?.claims;
        if claims.token_type != kind {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// 用 Refresh Token 换新的 Access Token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(user_id, claims.is_admin)
    }

    fn refresh_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let days = AppConfig::get().jwt.refresh_token_expiry;
        Self::refresh_cookie(refresh_token.to_string(), CookieDuration::days(days))
    }

    /// 注销用，立即过期
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), CookieDuration::seconds(0))
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}
