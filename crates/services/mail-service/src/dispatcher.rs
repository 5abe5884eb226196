//! Scheduled verification mail dispatcher.
//!
//! Each run snapshots the pending verifications, sends one mail per row and
//! then marks every snapshot row `DONE` in a single bulk update, whether or
//! not its send succeeded. No transaction is held across sends.
//!
//! The lease is renewed before each send. When a renewal fails another run
//! may already own the pending rows, so the run stops and marks only the rows
//! it attempted; the rest stay `PENDING` for the lease holder.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use common::AppResult;
use domain::{VerificationRequest, VerificationType};
use user_service_lib::VerificationService;

use crate::config::DispatchConfig;
use crate::error::MailError;
use crate::lease::{DispatchLease, LeaseGuard};
use crate::sender::{MailSender, MailType};

/// Outcome of one dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Rows in the pending snapshot
    pub snapshot: usize,
    pub sent: usize,
    pub failed: usize,
    /// Rows actually moved to `DONE`
    pub marked: u64,
    /// Another run held the lease
    pub skipped: bool,
    /// The lease was lost mid-run and sending stopped early
    pub lease_lost: bool,
}

impl DispatchReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }
}

/// `<base>?code=<code>&email=<email>`; values are appended as-is.
pub fn build_redirect_url(base: &str, code: &str, email: &str) -> String {
    format!("{}?code={}&email={}", base, code, email)
}

pub struct VerificationDispatcher {
    verifications: Arc<dyn VerificationService>,
    sender: Arc<dyn MailSender>,
    lease: Arc<dyn DispatchLease>,
    validating_email_url: String,
    changing_password_email_url: String,
    send_timeout: Duration,
    lease_ttl: Duration,
}

impl VerificationDispatcher {
    pub fn new(
        verifications: Arc<dyn VerificationService>,
        sender: Arc<dyn MailSender>,
        lease: Arc<dyn DispatchLease>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            verifications,
            sender,
            lease,
            validating_email_url: config.validating_email_url.clone(),
            changing_password_email_url: config.changing_password_email_url.clone(),
            send_timeout: config.send_timeout,
            lease_ttl: config.lease_ttl,
        }
    }

    fn base_url(&self, verification_type: VerificationType) -> &str {
        match verification_type {
            VerificationType::ValidateEmail => &self.validating_email_url,
            VerificationType::ChangePassword => &self.changing_password_email_url,
        }
    }

    /// Run one dispatch cycle under the lease.
    pub async fn run_once(&self) -> AppResult<DispatchReport> {
        let Some(mut guard) = self.lease.try_acquire().await? else {
            tracing::info!("Dispatch run skipped, another run holds the lease");
            return Ok(DispatchReport::skipped());
        };

        let result = self.dispatch(guard.as_mut()).await;

        if let Err(e) = guard.release().await {
            tracing::warn!(error = %e, "Failed to release dispatch lease");
        }
        result
    }

    async fn dispatch(&self, lease: &mut dyn LeaseGuard) -> AppResult<DispatchReport> {
        let pending = self.verifications.list_pending().await?;
        if pending.is_empty() {
            tracing::debug!("No pending verification mails");
            return Ok(DispatchReport::default());
        }

        tracing::info!(count = pending.len(), "Start sending verification mails");

        let mut report = DispatchReport {
            snapshot: pending.len(),
            ..Default::default()
        };
        let mut attempted: Vec<Uuid> = Vec::with_capacity(pending.len());
        for verification in &pending {
            if !self.renew(lease).await {
                report.lease_lost = true;
                tracing::warn!(
                    remaining = pending.len() - attempted.len(),
                    "Dispatch lease lost, leaving the remaining rows pending"
                );
                break;
            }

            match self.send(verification).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    tracing::warn!(
                        verification_id = %verification.id,
                        error = %e,
                        "Verification mail failed"
                    );
                    report.failed += 1;
                }
            }
            attempted.push(verification.id);
        }

        if !attempted.is_empty() {
            report.marked = self.verifications.mark_done(&attempted).await?;
        }

        tracing::info!(
            sent = report.sent,
            failed = report.failed,
            marked = report.marked,
            "End sending verification mails"
        );
        Ok(report)
    }

    /// Cover the next send plus the usual lease window.
    async fn renew(&self, lease: &mut dyn LeaseGuard) -> bool {
        match lease.renew(self.send_timeout + self.lease_ttl).await {
            Ok(held) => held,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to renew dispatch lease");
                false
            }
        }
    }

    async fn send(&self, verification: &VerificationRequest) -> Result<(), MailError> {
        let url = build_redirect_url(
            self.base_url(verification.verification_type),
            &verification.code,
            &verification.email,
        );
        let mail_type = MailType::from(verification.verification_type);

        tokio::time::timeout(
            self.send_timeout,
            self.sender.send(&url, &verification.email, mail_type),
        )
        .await
        .map_err(|_| MailError::Timeout(self.send_timeout))?
    }
}
