use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{
    RefreshTokenResponse, TokenVerificationResponse, UserInfoResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    match jwt::JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => {
            let config = service.get_config();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RefreshTokenResponse {
                    access_token,
                    expires_in: config.jwt.access_token_expiry * 60, // 秒
                },
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);

            // 顺带清掉已失效的 cookie
            let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();
            Ok(HttpResponse::Unauthorized().cookie(empty_cookie).json(
                ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Login expired or invalid, please login again",
                ),
            ))
        }
    }
}

pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 能进到这里说明 RequireJWT 已放行
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
