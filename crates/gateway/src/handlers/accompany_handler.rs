//! Accompany post handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{ApiResponse, AppResult, Created, Paginated, PaginationParams};
use domain::{Accompany, AccompanyDraft, AccompanyFilter, AccompanySort, Continent, Destination};

use crate::extractors::{Path, Query, ValidatedJson};
use crate::middleware::{require_verified, CurrentUser};
use crate::state::AppState;

/// Post body, used for both creation and full update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AccompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    #[schema(example = "Lisbon in May")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub continent: Continent,
    pub country: Option<String>,
    pub city: Option<String>,
    #[schema(example = "2026-05-01")]
    pub start_trip_date: NaiveDate,
    #[schema(example = "2026-05-08")]
    pub end_trip_date: NaiveDate,
    #[validate(url(message = "Banner image must be a URL"))]
    pub banner_image_url: Option<String>,
    #[validate(range(min = 1, message = "Headcount must be at least 1"))]
    pub headcount: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<AccompanyRequest> for AccompanyDraft {
    fn from(request: AccompanyRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            destination: Destination {
                continent: request.continent,
                country: request.country,
                city: request.city,
            },
            start_trip_date: request.start_trip_date,
            end_trip_date: request.end_trip_date,
            banner_image_url: request.banner_image_url,
            headcount: request.headcount,
            tags: request.tags,
        }
    }
}

/// Listing query: trip window, sort order and page
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccompanyListQuery {
    /// Trips ending on or after this date
    pub from: Option<NaiveDate>,
    /// Trips starting on or before this date
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub sort: AccompanySort,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AccompanyListQuery {
    fn into_parts(self) -> (AccompanyFilter, PaginationParams) {
        let defaults = PaginationParams::default();
        let filter = AccompanyFilter {
            from: self.from,
            to: self.to,
            sort: self.sort,
        };
        let pagination = PaginationParams::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        );
        (filter, pagination)
    }
}

pub fn accompany_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accompanies).post(create_accompany))
        .route(
            "/:id",
            get(get_accompany)
                .put(update_accompany)
                .delete(delete_accompany),
        )
        .route("/:id/close", post(close_accompany))
        .route("/:id/like", post(like_accompany).delete(unlike_accompany))
        .route(
            "/:id/replies",
            get(crate::handlers::reply_handler::list_replies)
                .post(crate::handlers::reply_handler::create_reply),
        )
}

#[utoipa::path(
    get,
    path = "/accompanies",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(AccompanyListQuery),
    responses(
        (status = 200, description = "One page of posts", body = [Accompany]),
        (status = 400, description = "Malformed query or reversed window")
    )
)]
pub async fn list_accompanies(
    State(state): State<AppState>,
    Query(query): Query<AccompanyListQuery>,
) -> AppResult<ApiResponse<Paginated<Accompany>>> {
    let (filter, pagination) = query.into_parts();
    let page = state.accompany_service.list(filter, pagination).await?;
    Ok(ApiResponse::success(page))
}

#[utoipa::path(
    post,
    path = "/accompanies",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    request_body = AccompanyRequest,
    responses(
        (status = 201, description = "Post created", body = Accompany),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Email not confirmed")
    )
)]
pub async fn create_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AccompanyRequest>,
) -> AppResult<Created<Accompany>> {
    require_verified(&current_user)?;
    let post = state
        .accompany_service
        .create(current_user.id, payload.into())
        .await?;
    Ok(Created(post))
}

/// Post detail; counts a view
#[utoipa::path(
    get,
    path = "/accompanies/{id}",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = Accompany),
        (status = 404, description = "Missing or deleted")
    )
)]
pub async fn get_accompany(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Accompany>> {
    let post = state.accompany_service.detail(id).await?;
    Ok(ApiResponse::success(post))
}

#[utoipa::path(
    put,
    path = "/accompanies/{id}",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = AccompanyRequest,
    responses(
        (status = 200, description = "Post updated", body = Accompany),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Missing or deleted")
    )
)]
pub async fn update_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AccompanyRequest>,
) -> AppResult<ApiResponse<Accompany>> {
    require_verified(&current_user)?;
    let post = state
        .accompany_service
        .update(id, current_user.id, payload.into())
        .await?;
    Ok(ApiResponse::success(post))
}

#[utoipa::path(
    delete,
    path = "/accompanies/{id}",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Missing or deleted")
    )
)]
pub async fn delete_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.accompany_service.delete(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}

/// Stop recruiting
#[utoipa::path(
    post,
    path = "/accompanies/{id}/close",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post closed", body = Accompany),
        (status = 403, description = "Not the author")
    )
)]
pub async fn close_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Accompany>> {
    require_verified(&current_user)?;
    let post = state.accompany_service.close(id, current_user.id).await?;
    Ok(ApiResponse::success(post))
}

#[utoipa::path(
    post,
    path = "/accompanies/{id}/like",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses((status = 200, description = "Liked"))
)]
pub async fn like_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.accompany_service.like(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}

#[utoipa::path(
    delete,
    path = "/accompanies/{id}/like",
    tag = "Accompanies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses((status = 200, description = "Like removed"))
)]
pub async fn unlike_accompany(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_verified(&current_user)?;
    state.accompany_service.unlike(id, current_user.id).await?;
    Ok(ApiResponse::empty())
}
