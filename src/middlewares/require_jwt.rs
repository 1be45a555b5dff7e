//! JWT 认证中间件
//!
//! 校验 `Authorization: Bearer <token>` 里的访问令牌，按 sub 从存储加载
//! 当前用户并写入请求扩展；令牌缺失、无效或用户已被删除时返回 401。
//! 处理程序里用 `RequireJWT::extract_user(&req)` 取认证后的用户。
//!
//! 注意 wrap 的执行顺序与注册顺序相反，`RequireAdmin` 要写在
//! `RequireJWT` 之前才是先认证后鉴权。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::AUTHORIZATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

#[derive(Clone)]
pub struct RequireJWT;

// 令牌换用户：验签、解析 sub、查库
async fn authenticate(req: &ServiceRequest) -> Result<User, String> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| "Authorization header is not a Bearer token".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("Access token rejected: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // CORS 预检不做认证
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("JWT authentication failed for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 取认证后的当前用户，仅在该中间件包裹的路由里有值
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_user_absent_without_middleware() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(RequireJWT::extract_user(&req).is_none());
    }
}
