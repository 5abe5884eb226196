//! Unified error handling and HTTP error translation.
//!
//! Every error raised by a service or extractor is an [`AppError`]. Each
//! variant resolves to exactly one [`ErrorCategory`], and each category maps
//! to a fixed (status, code, message) triple. Anything without a dedicated
//! category falls back to [`ErrorCategory::SystemFailure`].

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use thiserror::Error;

use crate::response::ApiResponse;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Request shape
    #[error("{0}")]
    InvalidInput(String),

    #[error("Malformed JSON body")]
    JsonParse,

    #[error("Invalid JSON field: {0:?}")]
    InvalidJsonField(Option<String>),

    #[error("Argument type mismatch: {0}")]
    TypeMismatch(String),

    #[error("HTTP method not supported")]
    MethodNotSupported,

    #[error("{0}")]
    InvalidArgument(String),

    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    AccessDenied,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Rate limiting
    #[error("Too many requests")]
    TooManyRequests,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Fixed, process-wide error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    SystemFailure,
    InvalidInput,
    JsonParseError,
    InvalidJsonField,
    MethodArgumentTypeMismatch,
    MethodNotSupported,
    AccessDenied,
    InvalidArgument,
    NotFound,
    Unauthorized,
    Conflict,
    TooManyRequests,
}

impl ErrorCategory {
    pub const ALL: &'static [ErrorCategory] = &[
        ErrorCategory::SystemFailure,
        ErrorCategory::InvalidInput,
        ErrorCategory::JsonParseError,
        ErrorCategory::InvalidJsonField,
        ErrorCategory::MethodArgumentTypeMismatch,
        ErrorCategory::MethodNotSupported,
        ErrorCategory::AccessDenied,
        ErrorCategory::InvalidArgument,
        ErrorCategory::NotFound,
        ErrorCategory::Unauthorized,
        ErrorCategory::Conflict,
        ErrorCategory::TooManyRequests,
    ];

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCategory::SystemFailure => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::InvalidInput
            | ErrorCategory::JsonParseError
            | ErrorCategory::InvalidJsonField
            | ErrorCategory::MethodArgumentTypeMismatch
            | ErrorCategory::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCategory::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCategory::AccessDenied => StatusCode::FORBIDDEN,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::SystemFailure => "SYSTEM_FAILURE",
            ErrorCategory::InvalidInput => "INVALID_INPUT",
            ErrorCategory::JsonParseError => "JSON_PARSE_ERROR",
            ErrorCategory::InvalidJsonField => "INVALID_JSON_FIELD",
            ErrorCategory::MethodArgumentTypeMismatch => "METHOD_ARGUMENT_TYPE_MISMATCH",
            ErrorCategory::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            ErrorCategory::AccessDenied => "ACCESS_DENIED",
            ErrorCategory::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::Unauthorized => "UNAUTHORIZED",
            ErrorCategory::Conflict => "CONFLICT",
            ErrorCategory::TooManyRequests => "TOO_MANY_REQUESTS",
        }
    }

    /// Message used when the error carries no detail of its own
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCategory::SystemFailure => "An internal error occurred",
            ErrorCategory::InvalidInput => "Invalid input",
            ErrorCategory::JsonParseError => "Invalid data was requested",
            ErrorCategory::InvalidJsonField => "Invalid data was requested",
            ErrorCategory::MethodArgumentTypeMismatch => "Request parameter has an invalid type",
            ErrorCategory::MethodNotSupported => "HTTP method not supported for this resource",
            ErrorCategory::AccessDenied => "Access denied",
            ErrorCategory::InvalidArgument => "Invalid argument",
            ErrorCategory::NotFound => "Resource not found",
            ErrorCategory::Unauthorized => "Authentication required",
            ErrorCategory::Conflict => "Resource already exists",
            ErrorCategory::TooManyRequests => "Too many requests",
        }
    }
}

impl AppError {
    /// Category this error is translated through
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::InvalidInput(_) => ErrorCategory::InvalidInput,
            AppError::JsonParse => ErrorCategory::JsonParseError,
            AppError::InvalidJsonField(_) => ErrorCategory::InvalidJsonField,
            AppError::TypeMismatch(_) => ErrorCategory::MethodArgumentTypeMismatch,
            AppError::MethodNotSupported => ErrorCategory::MethodNotSupported,
            AppError::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            AppError::Unauthorized | AppError::InvalidCredentials => ErrorCategory::Unauthorized,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => ErrorCategory::Unauthorized,
            AppError::AccessDenied => ErrorCategory::AccessDenied,
            AppError::NotFound => ErrorCategory::NotFound,
            AppError::Conflict(_) => ErrorCategory::Conflict,
            AppError::TooManyRequests => ErrorCategory::TooManyRequests,
            #[cfg(feature = "database")]
            AppError::Database(_) => ErrorCategory::SystemFailure,
            #[cfg(feature = "cache")]
            AppError::Cache(_) => ErrorCategory::SystemFailure,
            AppError::Internal(_) => ErrorCategory::SystemFailure,
        }
    }

    pub fn code(&self) -> &'static str {
        self.category().code()
    }

    pub fn status(&self) -> StatusCode {
        self.category().status()
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::InvalidArgument(msg)
            | AppError::TypeMismatch(msg) => msg.clone(),
            AppError::InvalidJsonField(Some(field)) => {
                format!("Invalid value for field '{}'", field)
            }
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::Conflict(_) => self.to_string(),

            // Hide details for internal/security errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                self.category().default_message().to_string()
            }
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            #[cfg(feature = "cache")]
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                self.category().default_message().to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                self.category().default_message().to_string()
            }

            _ => self.category().default_message().to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::<()>::failure(self.code(), self.user_message());

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Extractor Rejections
// =============================================================================

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::InvalidJsonField(offending_field(&err.body_text()))
            }
            JsonRejection::JsonSyntaxError(_) => AppError::JsonParse,
            other => AppError::InvalidInput(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::TypeMismatch(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Name of the field a JSON data error points at, when the message carries one.
///
/// Handles `missing field `x`` messages and `path.to.field: <reason>` prefixes;
/// returns the last path segment.
pub fn offending_field(message: &str) -> Option<String> {
    let detail = message
        .split_once("target type: ")
        .map(|(_, detail)| detail)
        .unwrap_or(message);

    if let Some((_, rest)) = detail.split_once("missing field `") {
        return rest
            .split('`')
            .next()
            .filter(|field| !field.is_empty())
            .map(str::to_string);
    }

    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    path.rsplit('.').next().map(str::to_string)
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            DomainError::Password(msg) => AppError::InvalidArgument(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// A stored value that no longer parses into its domain type
    pub fn corrupt(column: &str, value: impl std::fmt::Display) -> Self {
        AppError::Internal(format!("Unexpected value in {}: {}", column, value))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_category_codes_are_unique() {
        let codes: HashSet<_> = ErrorCategory::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), ErrorCategory::ALL.len());
    }

    #[test]
    fn test_invalid_argument_translates_to_400() {
        let err = AppError::invalid_argument("email must not be blank");

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(err.user_message(), "email must not be blank");
    }

    #[test]
    fn test_internal_falls_back_to_system_failure_and_hides_detail() {
        let err = AppError::internal("connection pool exhausted");

        assert_eq!(err.category(), ErrorCategory::SystemFailure);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("pool"));
    }

    #[test]
    fn test_http_layer_categories() {
        assert_eq!(AppError::MethodNotSupported.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(AppError::MethodNotSupported.code(), "METHOD_NOT_SUPPORTED");
        assert_eq!(AppError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::JsonParse.code(), "JSON_PARSE_ERROR");
        assert_eq!(
            AppError::TypeMismatch("bad id".into()).code(),
            "METHOD_ARGUMENT_TYPE_MISMATCH"
        );
        assert_eq!(AppError::InvalidCredentials.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_invalid_json_field_message_names_field() {
        let err = AppError::InvalidJsonField(Some("headcount".to_string()));
        assert_eq!(err.user_message(), "Invalid value for field 'headcount'");

        let err = AppError::InvalidJsonField(None);
        assert_eq!(err.user_message(), "Invalid data was requested");
        assert_eq!(err.code(), "INVALID_JSON_FIELD");
    }

    #[test]
    fn test_offending_field_from_typed_path() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       headcount: invalid type: string \"three\", expected i32 at line 1 column 20";
        assert_eq!(offending_field(message).as_deref(), Some("headcount"));
    }

    #[test]
    fn test_offending_field_takes_last_path_segment() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       destination.continent: unknown variant `MARS` at line 1 column 40";
        assert_eq!(offending_field(message).as_deref(), Some("continent"));
    }

    #[test]
    fn test_offending_field_from_missing_field() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       missing field `title` at line 1 column 2";
        assert_eq!(offending_field(message).as_deref(), Some("title"));
    }

    #[test]
    fn test_offending_field_not_derivable() {
        let message = "Failed to deserialize the JSON body into the target type: \
                       invalid type: sequence, expected a map at line 1 column 0";
        assert_eq!(offending_field(message), None);
    }

    #[test]
    fn test_domain_errors_map_to_categories() {
        assert_eq!(
            AppError::from(DomainError::invalid_argument("x")).category(),
            ErrorCategory::InvalidArgument
        );
        assert_eq!(
            AppError::from(DomainError::password("too short")).category(),
            ErrorCategory::InvalidArgument
        );
        assert_eq!(
            AppError::from(DomainError::internal("hash")).category(),
            ErrorCategory::SystemFailure
        );
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u8> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
    }
}
