//! Application state for dependency injection.

use std::sync::Arc;

use accompany_service_lib::{AccompanyService, ReplyService};
use auth_service_lib::AuthService;
use common::Cache;
use user_service_lib::{Database, UserService};

use crate::config::GatewayConfig;

/// Application state shared across handlers.
///
/// The database and cache handles are optional: the router only needs them
/// for health reporting and rate limiting, and tests run without either.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub accompany_service: Arc<dyn AccompanyService>,
    pub reply_service: Arc<dyn ReplyService>,
    pub database: Option<Database>,
    pub cache: Option<Arc<Cache>>,
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        accompany_service: Arc<dyn AccompanyService>,
        reply_service: Arc<dyn ReplyService>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            accompany_service,
            reply_service,
            database: None,
            cache: None,
            config,
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Enables rate limiting
    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }
}
