//! User handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, patch, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{ApiResponse, AppResult};
use domain::{
    TravelPreference, TravelPreferenceInput, UpdateProfile, UserDetailResponse, UserResponse,
};

use crate::extractors::{Json, Path, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Profile update; omitted fields keep their value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 20, message = "Nickname must be 1 to 20 characters"))]
    #[schema(example = "wanderer")]
    pub nickname: Option<String>,
    #[validate(length(max = 500, message = "Introduction must be at most 500 characters"))]
    pub introduction: Option<String>,
    #[validate(url(message = "Profile image must be a URL"))]
    pub profile_image_url: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            nickname: request.nickname,
            introduction: request.introduction,
            profile_image_url: request.profile_image_url,
        }
    }
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user).delete(delete_current_user))
        .route("/me/profile", patch(update_profile))
        .route("/me/travel-preference", put(update_travel_preference))
        .route("/:id", get(get_user))
}

/// Current user with travel preference
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserDetailResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserDetailResponse>> {
    let detail = state.user_service.get_user_detail(current_user.id).await?;
    Ok(ApiResponse::success(detail))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/users/me/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .update_profile(current_user.id, payload.into())
        .await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Replace the travel preference, creating it on first use
#[utoipa::path(
    put,
    path = "/users/me/travel-preference",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = TravelPreferenceInput,
    responses(
        (status = 200, description = "Preference stored", body = TravelPreference),
        (status = 400, description = "Unknown enum value")
    )
)]
pub async fn update_travel_preference(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(payload): Json<TravelPreferenceInput>,
) -> AppResult<ApiResponse<TravelPreference>> {
    let preference = state
        .user_service
        .update_travel_preference(current_user.id, payload)
        .await?;
    Ok(ApiResponse::success(preference))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 404, description = "Account already gone")
    )
)]
pub async fn delete_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete_by_email(&current_user.email).await?;
    tracing::info!(user_id = %current_user.id, "Account deleted");
    Ok(ApiResponse::empty())
}
