//! Auth Service Library
//!
//! Sign-up, sign-in, JWT issuing and the email-confirmation and
//! password-change flows built on the verification workflow.

pub mod config;
pub mod service;

pub use config::AuthServiceConfig;
pub use service::{AuthService, Authenticator, Claims, SignUp, TokenResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use service::MockAuthService;
