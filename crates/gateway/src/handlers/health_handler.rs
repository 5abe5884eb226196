//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use common::ApiResponse;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: ComponentHealth,
    pub cache: ComponentHealth,
}

/// Component state; `disabled` when it is not configured.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn disabled() -> Self {
        Self {
            status: "disabled",
            error: None,
        }
    }

    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "up",
                error: None,
            },
            Err(e) => Self {
                status: "down",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_down(&self) -> bool {
        self.status == "down"
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Reports database and cache reachability.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match &state.database {
        Some(db) => ComponentHealth::from_result(db.ping().await),
        None => ComponentHealth::disabled(),
    };
    let cache = match &state.cache {
        Some(cache) => ComponentHealth::from_result(cache.ping().await),
        None => ComponentHealth::disabled(),
    };

    let degraded = database.is_down() || cache.is_down();
    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        database,
        cache,
    };

    let status = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(ApiResponse::success(response))).into_response()
}
