//! Gateway configuration.

use std::env;

use common::{env_or, RateLimitConfig};

/// HTTP listener and rate limit settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Limit applied to every authenticated route
    pub rate_limit: RateLimitConfig,
    /// Stricter limit for `/auth`
    pub auth_rate_limit: RateLimitConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env_or("GATEWAY_PORT", defaults.port),
            rate_limit: RateLimitConfig {
                max_requests: env_or("RATE_LIMIT_REQUESTS", defaults.rate_limit.max_requests),
                window_seconds: env_or(
                    "RATE_LIMIT_WINDOW_SECONDS",
                    defaults.rate_limit.window_seconds,
                ),
            },
            auth_rate_limit: RateLimitConfig {
                max_requests: env_or(
                    "RATE_LIMIT_AUTH_REQUESTS",
                    defaults.auth_rate_limit.max_requests,
                ),
                window_seconds: env_or(
                    "RATE_LIMIT_AUTH_WINDOW_SECONDS",
                    defaults.auth_rate_limit.window_seconds,
                ),
            },
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rate_limit: RateLimitConfig::default(),
            auth_rate_limit: RateLimitConfig {
                max_requests: 10,
                window_seconds: 60,
            },
        }
    }
}
