//! Mail Service Library
//!
//! Mail senders, the verification dispatcher and the cron scheduler that
//! drives it.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod lease;
pub mod scheduler;
pub mod sender;

pub use config::{DispatchConfig, MailConfig, DEFAULT_DISPATCH_CRON};
pub use dispatcher::{build_redirect_url, DispatchReport, VerificationDispatcher};
pub use error::MailError;
pub use lease::{DispatchLease, LayeredLease, LeaseGuard, LocalLease, RedisLease};
pub use scheduler::DispatchScheduler;
pub use sender::{build_sender, LogMailSender, MailSender, MailType, SmtpMailSender};

#[cfg(any(test, feature = "test-utils"))]
pub use sender::MockMailSender;
