//! 速率限制中间件
//!
//! 固定窗口计数，按端点前缀独立限流。未认证请求以客户端 IP 为键，
//! 已认证请求以用户 ID 为键。超限返回 429 并携带 Retry-After。
//!
//! 用法：`web::resource("/login").wrap(RateLimit::login())`。

use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 计数缓存，键为 "前缀:身份"，值为 (窗口内请求数, 窗口起点)。
/// 过期只负责回收冷条目，窗口判定以值里的起点为准。
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u32, Instant)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(120))
        .max_capacity(100_000)
        .build()
});

/// 限流参数，builder 风格组装后 wrap 到资源上
#[derive(Clone)]
pub struct RateLimit {
    /// 窗口内允许的最大请求数
    max_requests: u32,
    /// 窗口长度（秒）
    window_secs: u64,
    /// 限制键前缀，区分不同端点
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// 登录端点：5 次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10 次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 通用接口：100 次/分钟/用户
    pub fn api() -> Self {
        Self::new(100, 60).with_prefix("api")
    }
}

/// 已认证请求按用户计数，其余按客户端 IP 计数
fn client_identity(req: &ServiceRequest) -> String {
    use crate::models::users::entities::User;
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }
    format!("ip:{}", client_ip(req))
}

/// 提取客户端 IP。
/// 反向代理场景依赖代理层改写转发头；直连环境转发头可被伪造。
fn client_ip(req: &ServiceRequest) -> String {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    let real_ip = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());
    if let Some(ip) = real_ip {
        return ip.to_string();
    }

    req.connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window = Duration::from_secs(self.window_secs);
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identity = client_identity(&req);
            let key = if key_prefix.is_empty() {
                identity
            } else {
                format!("{key_prefix}:{identity}")
            };

            // 窗口过期后重新从零计数
            let now = Instant::now();
            let (count, window_start) = match RATE_LIMIT_CACHE.get(&key).await {
                Some((c, s)) if now.duration_since(s) < window => (c, s),
                _ => (0, now),
            };

            if count >= max_requests {
                let retry_after = window
                    .saturating_sub(now.duration_since(window_start))
                    .as_secs()
                    .max(1);
                warn!(
                    "Rate limit exceeded for {}: {}/{}",
                    key, count, max_requests
                );
                return Ok(
                    req.into_response(too_many_requests(retry_after).map_into_right_body())
                );
            }

            RATE_LIMIT_CACHE.insert(key, (count + 1, window_start)).await;

            let mut res = srv.call(req).await?.map_into_left_body();
            res.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(max_requests),
            );
            res.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(max_requests - count - 1),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn preset_limits() {
        let cases = [
            (RateLimit::login(), 5, "login"),
            (RateLimit::refresh_token(), 10, "refresh"),
            (RateLimit::api(), 100, "api"),
        ];
        for (limit, max_requests, prefix) in cases {
            assert_eq!(limit.max_requests, max_requests);
            assert_eq!(limit.window_secs, 60);
            assert_eq!(limit.key_prefix, prefix);
        }
    }

    #[test]
    fn client_ip_prefers_forwarded_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_srv_request();
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn client_ip_reads_real_ip_header() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.23"))
            .to_srv_request();
        assert_eq!(client_ip(&req), "198.51.100.23");
    }

    #[test]
    fn client_ip_unknown_without_peer() {
        let req = TestRequest::default().to_srv_request();
        assert_eq!(client_ip(&req), "unknown");
    }
}
