//! Verification email entity.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::VerificationRequest;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_emails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub user_id: Uuid,
    pub code: String,
    pub verification_type: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for VerificationRequest {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(VerificationRequest {
            verification_type: model.verification_type.parse().map_err(|_| {
                AppError::corrupt("verification_emails.verification_type", &model.verification_type)
            })?,
            status: model
                .status
                .parse()
                .map_err(|_| AppError::corrupt("verification_emails.status", &model.status))?,
            id: model.id,
            email: model.email,
            user_id: model.user_id,
            code: model.code,
            created_at: model.created_at,
        })
    }
}
