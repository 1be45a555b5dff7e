use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let user = match storage.get_user_by_email(&login_request.email).await {
        Ok(Some(user)) => user,
        // 账号不存在与密码错误返回同一提示
        Ok(None) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Email or password is incorrect",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Email or password is incorrect",
        )));
    }

    // 最后登录时间写失败不拦截登录
    let _ = storage.update_last_login(user.id).await;

    let remember_me_ttl = login_request
        .remember_me
        .then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry));

    let token_pair = match user.generate_token_pair(remember_me_ttl) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!("User {} logged in successfully", user.email);

    let refresh_cookie = jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60, // 秒
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
