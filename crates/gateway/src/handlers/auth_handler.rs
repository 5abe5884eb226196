//! Authentication handlers.

use axum::{extract::Extension, extract::State, routing::post, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::{Claims, SignUp, TokenResponse};
use common::{ApiResponse, AppResult, Created};
use domain::{Gender, UserResponse};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Sign-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "traveler@withaeng.com")]
    pub email: String,
    /// Minimum 8 characters
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, max = 20, message = "Nickname must be 1 to 20 characters"))]
    #[schema(example = "wanderer")]
    pub nickname: String,
    #[schema(example = "1995-04-01")]
    pub birth: NaiveDate,
    pub gender: Gender,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "traveler@withaeng.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Code received in the confirmation mail
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ValidateEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordChangeMailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/validate-email", post(validate_email))
        .route("/password/mail", post(request_password_change))
        .route("/password", post(change_password))
}

/// Routes that need a valid token
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh_token))
}

/// Create a NON_USER account and queue its confirmation mail
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .sign_up(SignUp {
            email: payload.email,
            password: payload.password,
            nickname: payload.nickname,
            birth: payload.birth,
            gender: payload.gender,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state
        .auth_service
        .sign_in(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::success(token))
}

/// Confirm the email address; the account becomes USER
#[utoipa::path(
    post,
    path = "/auth/validate-email",
    tag = "Authentication",
    request_body = ValidateEmailRequest,
    responses(
        (status = 200, description = "Email confirmed, fresh token issued", body = TokenResponse),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn validate_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ValidateEmailRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state
        .auth_service
        .validate_email(payload.email, payload.code)
        .await?;

    Ok(ApiResponse::success(token))
}

#[utoipa::path(
    post,
    path = "/auth/password/mail",
    tag = "Authentication",
    request_body = PasswordChangeMailRequest,
    responses(
        (status = 200, description = "Password change mail queued"),
        (status = 404, description = "Unknown account")
    )
)]
pub async fn request_password_change(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PasswordChangeMailRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .request_password_change(payload.email)
        .await?;

    Ok(ApiResponse::empty())
}

#[utoipa::path(
    post,
    path = "/auth/password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .change_password(payload.email, payload.code, payload.new_password)
        .await?;

    Ok(ApiResponse::empty())
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = TokenResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state.auth_service.refresh_token(&claims).await?;
    Ok(ApiResponse::success(token))
}
