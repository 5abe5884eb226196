//! Route configuration.

use axum::{
    http::StatusCode,
    middleware::{self, map_response},
    response::{IntoResponse, Response},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::AppError;

use crate::handlers::{
    accompany_routes, auth_routes, health_routes, reply_routes, token_routes, user_routes,
};
use crate::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let authenticated = |routes: Router<AppState>| {
        routes
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_middleware,
            ))
    };

    Router::new()
        // Health check (no auth, no rate limit)
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes (no auth required, stricter rate limit)
        .nest(
            "/auth",
            auth_routes()
                .merge(token_routes().route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    rate_limit_auth_middleware,
                )),
        )
        .nest("/users", authenticated(user_routes()))
        .nest("/accompanies", authenticated(accompany_routes()))
        .nest("/replies", authenticated(reply_routes()))
        .fallback(unknown_route)
        .layer(map_response(method_not_supported))
        .with_state(state)
}

async fn unknown_route() -> AppError {
    AppError::NotFound
}

/// Give axum's bare 405 the error envelope.
async fn method_not_supported(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return AppError::MethodNotSupported.into_response();
    }
    response
}
