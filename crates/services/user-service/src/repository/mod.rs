//! Repository layer for data access.

pub mod entities;
mod user_repository;
mod verification_repository;

pub use user_repository::{UserRepository, UserStore};
pub use verification_repository::{VerificationRepository, VerificationStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use verification_repository::MockVerificationRepository;
