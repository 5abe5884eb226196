//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::string_enum;
use crate::travel_preference::TravelPreference;

string_enum! {
    /// Account role. Sign-up creates `NonUser`; confirming the email grants `User`.
    pub enum UserRole {
        NonUser => "NON_USER",
        User => "USER",
    }
}

impl UserRole {
    /// Whether the role may create or modify content
    pub fn is_verified(&self) -> bool {
        matches!(self, UserRole::User)
    }
}

string_enum! {
    pub enum Gender {
        Male => "MALE",
        Female => "FEMALE",
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub nickname: String,
    pub introduction: Option<String>,
    pub profile_image_url: Option<String>,
    pub birth: NaiveDate,
    pub gender: Gender,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.role.is_verified()
    }
}

/// Data required to create an account (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub birth: NaiveDate,
    pub gender: Gender,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProfile {
    pub nickname: Option<String>,
    pub introduction: Option<String>,
    pub profile_image_url: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub introduction: Option<String>,
    pub profile_image_url: Option<String>,
    pub birth: NaiveDate,
    pub gender: Gender,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            introduction: user.introduction,
            profile_image_url: user.profile_image_url,
            birth: user.birth,
            gender: user.gender,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// A user together with the optional travel preference record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub travel_preference: Option<TravelPreference>,
}
