//! Auth service configuration.

use std::env;

use common::{env_or, AppError, AppResult};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// JWT secret for signing tokens (min 32 characters)
    pub jwt_secret: String,
    /// JWT token expiration in hours
    pub jwt_expiration_hours: i64,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails when `JWT_SECRET` is missing or shorter than
    /// [`MIN_JWT_SECRET_LENGTH`].
    pub fn from_env() -> AppResult<Self> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            AppError::internal("JWT_SECRET must be set (minimum 32 characters)")
        })?;

        Self::new(
            jwt_secret,
            env_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
        )
    }

    pub fn new(jwt_secret: String, jwt_expiration_hours: i64) -> AppResult<Self> {
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            jwt_secret,
            jwt_expiration_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(AuthServiceConfig::new("short".to_string(), 24).is_err());
    }

    #[test]
    fn test_long_secret_is_accepted() {
        let config = AuthServiceConfig::new("s".repeat(MIN_JWT_SECRET_LENGTH), 12).unwrap();
        assert_eq!(config.jwt_expiration_hours, 12);
    }
}
