//! Verification email persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::verification_email::{self, ActiveModel, Entity as VerificationEntity};
use common::AppResult;
use domain::{NewVerification, VerificationRequest, VerificationStatus, VerificationType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verification repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Insert a new row in status `PENDING`
    async fn save(&self, verification: NewVerification) -> AppResult<VerificationRequest>;

    /// Every row whose status differs from `status`
    async fn find_all_by_status_not(
        &self,
        status: VerificationStatus,
    ) -> AppResult<Vec<VerificationRequest>>;

    /// Move the listed rows to `status` in a single statement.
    ///
    /// Rows already in `status` and ids with no row are left alone; the
    /// return value counts only rows that actually changed.
    async fn update_status_by_ids(&self, ids: &[Uuid], status: VerificationStatus)
        -> AppResult<u64>;

    /// Most recent row matching the triple, whatever its status
    async fn find_latest_by_email_and_code(
        &self,
        email: &str,
        code: &str,
        verification_type: VerificationType,
    ) -> AppResult<Option<VerificationRequest>>;
}

/// SeaORM-backed implementation of [`VerificationRepository`]
pub struct VerificationStore {
    db: DatabaseConnection,
}

impl VerificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VerificationRepository for VerificationStore {
    async fn save(&self, verification: NewVerification) -> AppResult<VerificationRequest> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(verification.email),
            user_id: Set(verification.user_id),
            code: Set(verification.code),
            verification_type: Set(verification.verification_type.as_str().to_string()),
            status: Set(VerificationStatus::Pending.as_str().to_string()),
            created_at: Set(Utc::now()),
        };

        VerificationRequest::try_from(active_model.insert(&self.db).await?)
    }

    async fn find_all_by_status_not(
        &self,
        status: VerificationStatus,
    ) -> AppResult<Vec<VerificationRequest>> {
        VerificationEntity::find()
            .filter(verification_email::Column::Status.ne(status.as_str()))
            .order_by_asc(verification_email::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(VerificationRequest::try_from)
            .collect()
    }

    async fn update_status_by_ids(
        &self,
        ids: &[Uuid],
        status: VerificationStatus,
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = VerificationEntity::update_many()
            .col_expr(
                verification_email::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(verification_email::Column::Id.is_in(ids.iter().copied()))
            .filter(verification_email::Column::Status.ne(status.as_str()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn find_latest_by_email_and_code(
        &self,
        email: &str,
        code: &str,
        verification_type: VerificationType,
    ) -> AppResult<Option<VerificationRequest>> {
        VerificationEntity::find()
            .filter(verification_email::Column::Email.eq(email))
            .filter(verification_email::Column::Code.eq(code))
            .filter(verification_email::Column::VerificationType.eq(verification_type.as_str()))
            .order_by_desc(verification_email::Column::CreatedAt)
            .one(&self.db)
            .await?
            .map(VerificationRequest::try_from)
            .transpose()
    }
}
