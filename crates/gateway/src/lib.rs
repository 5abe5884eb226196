//! API Gateway Library
//!
//! HTTP surface of the withaeng backend: routes, handlers, authentication
//! and rate limiting middleware, request extractors and the OpenAPI document.
//! Services are injected as trait objects through [`AppState`].

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use crate::config::GatewayConfig;
pub use crate::routes::create_router;
pub use crate::state::AppState;

/// Build the router with tracing and CORS layers applied.
pub fn build_app(state: AppState) -> axum::Router {
    create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
