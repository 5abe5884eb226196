//! User and travel preference persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::travel_preference::{
    self, ActiveModel as PreferenceActiveModel, Entity as PreferenceEntity,
};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{NewUser, TravelPreference, TravelPreferenceInput, UpdateProfile, User, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new account with role `NON_USER`
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply the present fields of `profile`
    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> AppResult<User>;

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Remove an account; returns the number of rows deleted
    async fn delete_by_email(&self, email: &str) -> AppResult<u64>;

    async fn find_travel_preference(&self, user_id: Uuid) -> AppResult<Option<TravelPreference>>;

    /// Insert the preference row for a user that has none yet
    async fn create_travel_preference(
        &self,
        user_id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference>;

    /// Overwrite the existing preference row
    async fn replace_travel_preference(
        &self,
        user_id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference>;
}

/// SeaORM-backed implementation of [`UserRepository`]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

fn to_json<T: serde::Serialize>(values: &[T]) -> AppResult<sea_orm::JsonValue> {
    serde_json::to_value(values).map_err(|e| AppError::internal(format!("Serialization error: {}", e)))
}

fn preference_model(
    user_id: Uuid,
    input: &TravelPreferenceInput,
) -> AppResult<PreferenceActiveModel> {
    Ok(PreferenceActiveModel {
        user_id: Set(user_id),
        mbti: Set(to_json(&input.mbti)?),
        prefer_travel_type: Set(input.prefer_travel_type.map(|v| v.as_str().to_string())),
        prefer_travel_themes: Set(to_json(&input.prefer_travel_themes)?),
        consume_style: Set(input.consume_style.map(|v| v.as_str().to_string())),
        food_restrictions: Set(to_json(&input.food_restrictions)?),
        smoking_type: Set(input.smoking_type.map(|v| v.as_str().to_string())),
        drinking_type: Set(input.drinking_type.map(|v| v.as_str().to_string())),
        updated_at: Set(Utc::now()),
    })
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            nickname: Set(new_user.nickname),
            introduction: Set(None),
            profile_image_url: Set(None),
            birth: Set(new_user.birth),
            gender: Set(new_user.gender.as_str().to_string()),
            role: Set(UserRole::NonUser.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
                _ => AppError::from(e),
            }
        })?;
        User::try_from(model)
    }

    async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(nickname) = profile.nickname {
            active.nickname = Set(nickname);
        }
        if let Some(introduction) = profile.introduction {
            active.introduction = Set(Some(introduction));
        }
        if let Some(profile_image_url) = profile.profile_image_url {
            active.profile_image_url = Set(Some(profile_image_url));
        }
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(&self.db).await?)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(Utc::now());

        User::try_from(active.update(&self.db).await?)
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<u64> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Email.eq(email))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_travel_preference(&self, user_id: Uuid) -> AppResult<Option<TravelPreference>> {
        PreferenceEntity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(TravelPreference::try_from)
            .transpose()
    }

    async fn create_travel_preference(
        &self,
        user_id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference> {
        let model = preference_model(user_id, &input)?.insert(&self.db).await?;
        TravelPreference::try_from(model)
    }

    async fn replace_travel_preference(
        &self,
        user_id: Uuid,
        input: TravelPreferenceInput,
    ) -> AppResult<TravelPreference> {
        let exists = PreferenceEntity::find()
            .filter(travel_preference::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::NotFound);
        }

        let model = preference_model(user_id, &input)?.update(&self.db).await?;
        TravelPreference::try_from(model)
    }
}
