//! Rate limiting middleware.
//!
//! Active only when a Redis cache is configured. Cache failures deny the
//! request.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use common::{AppError, RateLimitConfig};

use crate::state::AppState;

/// Rate limit middleware for general endpoints.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.config.rate_limit;
    rate_limit_internal(state, connect_info, request, next, limit).await
}

/// Rate limit middleware for auth endpoints (stricter).
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let limit = state.config.auth_rate_limit;
    rate_limit_internal(state, connect_info, request, next, limit).await
}

async fn rate_limit_internal(
    state: AppState,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
    limit: RateLimitConfig,
) -> Response {
    let Some(cache) = state.cache.as_ref() else {
        return next.run(request).await;
    };

    let ip = get_client_ip(&request, connect_info);
    let identifier = format!("{}:{}", request.uri().path(), ip);

    let count = match cache
        .check_rate_limit(&identifier, limit.max_requests, limit.window_seconds)
        .await
    {
        Ok((count, true)) => count,
        Ok((_, false)) => {
            tracing::debug!(%identifier, "Rate limit exceeded");
            return rate_limit_exceeded_response(limit);
        }
        Err(e) => {
            tracing::error!(error = ?e, "Rate limit check failed, denying request");
            return rate_limit_exceeded_response(limit);
        }
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit.max_requests));
    headers.insert(
        "X-RateLimit-Remaining",
        HeaderValue::from(limit.max_requests.saturating_sub(count)),
    );

    response
}

fn get_client_ip(request: &Request<Body>, connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limit_exceeded_response(limit: RateLimitConfig) -> Response {
    let mut response = AppError::TooManyRequests.into_response();

    let headers = response.headers_mut();
    headers.insert("Retry-After", HeaderValue::from(limit.window_seconds));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit.max_requests));

    response
}
