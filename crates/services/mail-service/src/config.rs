//! Mail and dispatch configuration.

use std::env;
use std::time::Duration;

use common::env_or;

/// Default cron expression: top of every minute
pub const DEFAULT_DISPATCH_CRON: &str = "0 * * * * *";

/// SMTP settings. Without `SMTP_HOST` mail is only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub smtp_tls: bool,
}

impl MailConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            smtp_host: env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty()),
            smtp_port: env_or("SMTP_PORT", defaults.smtp_port),
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or(defaults.smtp_from),
            smtp_tls: env::var("SMTP_TLS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.smtp_tls),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@withaeng.com".to_string(),
            smtp_tls: true,
        }
    }
}

/// Dispatcher schedule, redirect targets and limits.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Six-field cron expression (seconds first)
    pub cron: String,
    /// Link base for `VALIDATE_EMAIL` mails
    pub validating_email_url: String,
    /// Link base for `CHANGE_PASSWORD` mails
    pub changing_password_email_url: String,
    /// Upper bound on a single send
    pub send_timeout: Duration,
    /// How long a run may hold the single-flight lease
    pub lease_ttl: Duration,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cron: env::var("DISPATCH_CRON").unwrap_or(defaults.cron),
            validating_email_url: env::var("VALIDATING_EMAIL_URL")
                .unwrap_or(defaults.validating_email_url),
            changing_password_email_url: env::var("CHANGING_PASSWORD_EMAIL_URL")
                .unwrap_or(defaults.changing_password_email_url),
            send_timeout: Duration::from_secs(env_or(
                "DISPATCH_SEND_TIMEOUT_SECONDS",
                defaults.send_timeout.as_secs(),
            )),
            lease_ttl: Duration::from_secs(env_or(
                "DISPATCH_LEASE_SECONDS",
                defaults.lease_ttl.as_secs(),
            )),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cron: DEFAULT_DISPATCH_CRON.to_string(),
            validating_email_url: "http://localhost:3000/auth/validate-email".to_string(),
            changing_password_email_url: "http://localhost:3000/auth/change-password".to_string(),
            send_timeout: Duration::from_secs(10),
            lease_ttl: Duration::from_secs(55),
        }
    }
}
