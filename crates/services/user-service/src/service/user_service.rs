//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    NewUser, TravelPreference, TravelPreferenceInput, UpdateProfile, User, UserDetailResponse,
    UserRole, MAX_INTRODUCTION_LENGTH, MAX_NICKNAME_LENGTH,
};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user by ID together with the travel preference record
    async fn get_user_detail(&self, id: Uuid) -> AppResult<UserDetailResponse>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new account (password already hashed)
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> AppResult<User>;

    /// Create the preference record on first use, replace it afterwards
    async fn update_travel_preference(
        &self,
        id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Promote a confirmed account to `USER`
    async fn grant_user_role(&self, id: Uuid) -> AppResult<User>;

    async fn delete_by_email(&self, email: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

fn validate_profile(profile: &UpdateProfile) -> AppResult<()> {
    if let Some(nickname) = &profile.nickname {
        if nickname.trim().is_empty() {
            return Err(AppError::invalid_argument("nickname must not be blank"));
        }
        if nickname.chars().count() > MAX_NICKNAME_LENGTH {
            return Err(AppError::invalid_argument(format!(
                "nickname must be at most {} characters",
                MAX_NICKNAME_LENGTH
            )));
        }
    }
    if let Some(introduction) = &profile.introduction {
        if introduction.chars().count() > MAX_INTRODUCTION_LENGTH {
            return Err(AppError::invalid_argument(format!(
                "introduction must be at most {} characters",
                MAX_INTRODUCTION_LENGTH
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_detail(&self, id: Uuid) -> AppResult<UserDetailResponse> {
        let user = self.get_user(id).await?;
        let travel_preference = self.repo.find_travel_preference(id).await?;

        Ok(UserDetailResponse {
            user: user.into(),
            travel_preference,
        })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        self.repo.create(user).await
    }

    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> AppResult<User> {
        validate_profile(&profile)?;
        self.repo.update_profile(id, profile).await
    }

    async fn update_travel_preference(
        &self,
        id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference> {
        self.get_user(id).await?;
        let input = input.normalized();

        match self.repo.find_travel_preference(id).await? {
            Some(_) => self.repo.replace_travel_preference(id, input).await,
            None => self.repo.create_travel_preference(id, input).await,
        }
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        self.repo.update_password(id, password_hash).await
    }

    async fn grant_user_role(&self, id: Uuid) -> AppResult<User> {
        let user = self.get_user(id).await?;
        if user.role == UserRole::User {
            return Ok(user);
        }

        let user = self.repo.update_role(id, UserRole::User).await?;
        tracing::info!(user_id = %id, "Granted USER role");
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<()> {
        match self.repo.delete_by_email(email).await? {
            0 => Err(AppError::NotFound),
            _ => Ok(()),
        }
    }
}
