//! Mail delivery and scheduling errors.

use common::AppError;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("send timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Build(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Smtp(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::internal(err.to_string())
    }
}
