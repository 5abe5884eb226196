//! SeaORM entities owned by the user service.

pub mod travel_preference;
pub mod user;
pub mod verification_email;
