//! Verification workflow.
//!
//! Owns creation of verification rows and their one-way `PENDING -> DONE`
//! transition. Creating a row never sends mail; the dispatcher picks pending
//! rows up on its own schedule.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{NewVerification, VerificationRequest, VerificationStatus, VerificationType};

use crate::repository::{UserRepository, VerificationRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Record a new pending verification for an existing user.
    ///
    /// Fails with `NotFound` when the user does not exist and with
    /// `InvalidArgument` when `email` or `code` is blank. Nothing is persisted
    /// on failure.
    async fn create(
        &self,
        email: String,
        user_id: Uuid,
        code: String,
        verification_type: VerificationType,
    ) -> AppResult<VerificationRequest>;

    /// Every verification not yet `DONE`
    async fn list_pending(&self) -> AppResult<Vec<VerificationRequest>>;

    /// Mark the given rows `DONE`. Idempotent; unknown ids are ignored.
    async fn mark_done(&self, ids: &[Uuid]) -> AppResult<u64>;

    async fn find_latest(
        &self,
        email: &str,
        code: &str,
        verification_type: VerificationType,
    ) -> AppResult<Option<VerificationRequest>>;
}

pub struct VerificationManager {
    users: Arc<dyn UserRepository>,
    verifications: Arc<dyn VerificationRepository>,
}

impl VerificationManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        verifications: Arc<dyn VerificationRepository>,
    ) -> Self {
        Self {
            users,
            verifications,
        }
    }
}

#[async_trait]
impl VerificationService for VerificationManager {
    async fn create(
        &self,
        email: String,
        user_id: Uuid,
        code: String,
        verification_type: VerificationType,
    ) -> AppResult<VerificationRequest> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if email.trim().is_empty() {
            return Err(AppError::invalid_argument("email must not be blank"));
        }
        if code.trim().is_empty() {
            return Err(AppError::invalid_argument("code must not be blank"));
        }

        let saved = self
            .verifications
            .save(NewVerification {
                email,
                user_id,
                code,
                verification_type,
            })
            .await?;

        tracing::debug!(
            verification_id = %saved.id,
            verification_type = %saved.verification_type,
            "Verification recorded"
        );
        Ok(saved)
    }

    async fn list_pending(&self) -> AppResult<Vec<VerificationRequest>> {
        self.verifications
            .find_all_by_status_not(VerificationStatus::Done)
            .await
    }

    async fn mark_done(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Ok(0);
        }

        self.verifications
            .update_status_by_ids(&unique, VerificationStatus::Done)
            .await
    }

    async fn find_latest(
        &self,
        email: &str,
        code: &str,
        verification_type: VerificationType,
    ) -> AppResult<Option<VerificationRequest>> {
        self.verifications
            .find_latest_by_email_and_code(email, code, verification_type)
            .await
    }
}
