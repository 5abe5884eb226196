//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub introduction: Option<String>,
    pub profile_image_url: Option<String>,
    pub birth: Date,
    pub gender: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(User {
            gender: model
                .gender
                .parse()
                .map_err(|_| AppError::corrupt("users.gender", &model.gender))?,
            role: model
                .role
                .parse()
                .map_err(|_| AppError::corrupt("users.role", &model.role))?,
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            nickname: model.nickname,
            introduction: model.introduction,
            profile_image_url: model.profile_image_url,
            birth: model.birth,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
