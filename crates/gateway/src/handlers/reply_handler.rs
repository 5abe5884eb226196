//! Reply handlers. Listing and creation hang off `/accompanies/{id}/replies`.

use axum::{
    extract::{Extension, State},
    routing::{post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{ApiResponse, AppResult, Created};
use domain::Reply;

use crate::extractors::{Path, ValidatedJson};
use crate::middleware::{require_verified, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReplyRequest {
    #[validate(length(min = 1, message = "Reply content is required"))]
    pub content: String,
    /// Root reply being answered
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReplyRequest {
    #[validate(length(min = 1, message = "Reply content is required"))]
    pub content: String,
}

pub fn reply_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", put(update_reply).delete(delete_reply))
        .route("/:id/like", post(like_reply).delete(unlike_reply))
}

/// Replies of a post, grouped under their root
#[utoipa::path(
    get,
    path = "/accompanies/{id}/replies",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Replies ordered by position", body = [Reply]),
        (status = 404, description = "Missing post")
    )
)]
pub async fn list_replies(
    State(state): State<AppState>,
    Path(accompany_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<Reply>>> {
    let replies = state.reply_service.list_by_accompany(accompany_id).await?;
    Ok(ApiResponse::success(replies))
}

#[utoipa::path(
    post,
    path = "/accompanies/{id}/replies",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CreateReplyRequest,
    responses(
        (status = 201, description = "Reply created", body = Reply),
        (status = 400, description = "Blank content or nesting too deep"),
        (status = 403, description = "Email not confirmed")
    )
)]
pub async fn create_reply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(accompany_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateReplyRequest>,
) -> AppResult<Created<Reply>> {
    require_verified(&current_user)?;
    let reply = state
        .reply_service
        .create(
            accompany_id,
            current_user.id,
            payload.parent_id,
            payload.content,
        )
        .await?;
    Ok(Created(reply))
}

#[utoipa::path(
    put,
    path = "/replies/{id}",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reply ID")),
    request_body = UpdateReplyRequest,
    responses(
        (status = 200, description = "Reply updated", body = Reply),
        (status = 403, description = "Not the author")
    )
)]
pub async fn update_reply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateReplyRequest>,
) -> AppResult<ApiResponse<Reply>> {
    require_verified(&current_user)?;
    let reply = state
        .reply_service
        .update(id, current_user.id, payload.content)
        .await?;
    Ok(ApiResponse::success(reply))
}

#[utoipa::path(
    delete,
    path = "/replies/{id}",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reply ID")),
    responses(
        (status = 200, description = "Reply deleted"),
        (status = 403, description = "Not the author")
    )
)]
pub async fn delete_reply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.reply_service.delete(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}

#[utoipa::path(
    post,
    path = "/replies/{id}/like",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reply ID")),
    responses((status = 200, description = "Liked"))
)]
pub async fn like_reply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.reply_service.like(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}

#[utoipa::path(
    delete,
    path = "/replies/{id}/like",
    tag = "Replies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reply ID")),
    responses((status = 200, description = "Like removed"))
)]
pub async fn unlike_reply(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.reply_service.unlike(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}
