//! Service layer - Business logic.

mod user_service;
mod verification_service;

pub use user_service::{UserManager, UserService};
pub use verification_service::{VerificationManager, VerificationService};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
#[cfg(any(test, feature = "test-utils"))]
pub use verification_service::MockVerificationService;
