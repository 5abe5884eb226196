//! HTTP handlers grouped by resource.

pub mod accompany_handler;
pub mod auth_handler;
pub mod health_handler;
pub mod reply_handler;
pub mod user_handler;

pub use accompany_handler::accompany_routes;
pub use auth_handler::{auth_routes, token_routes};
pub use health_handler::health_routes;
pub use reply_handler::reply_routes;
pub use user_handler::user_routes;
