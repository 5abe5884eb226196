//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared by the services and the gateway.

mod macros;

pub mod accompany;
pub mod constants;
pub mod error;
pub mod password;
pub mod travel_preference;
pub mod user;
pub mod verification;

pub use accompany::{
    normalize_tags, validate_reply_content, Accompany, AccompanyDraft, AccompanyFilter,
    AccompanySort, AccompanyStatus, Continent, Destination, HistoryAction, Reply,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use travel_preference::{
    ConsumeStyle, DrinkingType, FoodRestriction, Mbti, SmokingType, TravelPreference,
    TravelPreferenceInput, TravelTheme, TravelType,
};
pub use user::{Gender, NewUser, UpdateProfile, User, UserDetailResponse, UserResponse, UserRole};
pub use verification::{
    generate_code, NewVerification, VerificationRequest, VerificationStatus, VerificationType,
};
