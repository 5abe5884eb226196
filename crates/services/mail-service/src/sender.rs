//! Outbound mail delivery.
//!
//! [`SmtpMailSender`] delivers through lettre's async SMTP transport.
//! [`LogMailSender`] only writes the message to the log and is selected when
//! no SMTP host is configured.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use domain::VerificationType;

use crate::config::MailConfig;
use crate::error::MailError;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Kind of mail; decides subject and body wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailType {
    ValidateEmail,
    ChangePassword,
}

impl MailType {
    pub fn subject(&self) -> &'static str {
        match self {
            MailType::ValidateEmail => "[withaeng] Confirm your email address",
            MailType::ChangePassword => "[withaeng] Reset your password",
        }
    }

    /// Plain-text body carrying `link`
    pub fn render(&self, link: &str) -> String {
        match self {
            MailType::ValidateEmail => format!(
                "Welcome to withaeng!\n\n\
                 Open the link below to confirm your email address:\n{}\n\n\
                 If you did not sign up, you can ignore this mail.",
                link
            ),
            MailType::ChangePassword => format!(
                "A password change was requested for your withaeng account.\n\n\
                 Open the link below to choose a new password:\n{}\n\n\
                 If you did not request this, you can ignore this mail.",
                link
            ),
        }
    }
}

impl From<VerificationType> for MailType {
    fn from(verification_type: VerificationType) -> Self {
        match verification_type {
            VerificationType::ValidateEmail => MailType::ValidateEmail,
            VerificationType::ChangePassword => MailType::ChangePassword,
        }
    }
}

/// Mail gateway used by the dispatcher.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Deliver `content` (the redirect link) to `to`.
    async fn send(&self, content: &str, to: &str, mail_type: MailType) -> Result<(), MailError>;
}

/// SMTP delivery via lettre.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailSender {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| MailError::Smtp("SMTP_HOST is not set".to_string()))?;
        // The pooled transport spawns onto the runtime, so it is built last.
        let from: Mailbox = config.smtp_from.parse()?;

        let mut builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, content: &str, to: &str, mail_type: MailType) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(mail_type.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(mail_type.render(content))?;

        self.transport.send(message).await?;
        tracing::info!(to = %to, mail_type = ?mail_type, "Mail sent");
        Ok(())
    }
}

/// Development sender: logs instead of delivering.
#[derive(Debug, Default, Clone)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, content: &str, to: &str, mail_type: MailType) -> Result<(), MailError> {
        tracing::info!(
            to = %to,
            subject = %mail_type.subject(),
            link = %content,
            "SMTP not configured, mail logged instead of sent"
        );
        Ok(())
    }
}

/// Pick the sender matching `config`.
pub fn build_sender(config: &MailConfig) -> Result<Arc<dyn MailSender>, MailError> {
    if config.is_configured() {
        Ok(Arc::new(SmtpMailSender::new(config)?))
    } else {
        tracing::warn!("SMTP_HOST not set, using the logging mail sender");
        Ok(Arc::new(LogMailSender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_type_follows_verification_type() {
        assert_eq!(
            MailType::from(VerificationType::ChangePassword),
            MailType::ChangePassword
        );
        assert_eq!(
            MailType::from(VerificationType::ValidateEmail),
            MailType::ValidateEmail
        );
    }

    #[test]
    fn test_render_embeds_link() {
        let body = MailType::ValidateEmail.render("https://withaeng.com/v?code=A1");
        assert!(body.contains("https://withaeng.com/v?code=A1"));
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let sender = LogMailSender;
        let result = sender
            .send("https://withaeng.com/v", "a@withaeng.com", MailType::ChangePassword)
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_unconfigured_smtp_selects_log_sender() {
        assert!(build_sender(&MailConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_smtp_sender_rejects_invalid_from() {
        let config = MailConfig {
            smtp_host: Some("smtp.withaeng.com".to_string()),
            smtp_from: "not an address".to_string(),
            smtp_tls: false,
            ..Default::default()
        };
        assert!(matches!(
            SmtpMailSender::new(&config),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_smtp_sender_builds_with_valid_from() {
        let config = MailConfig {
            smtp_host: Some("smtp.withaeng.com".to_string()),
            smtp_from: "noreply@withaeng.com".to_string(),
            smtp_tls: false,
            ..Default::default()
        };
        assert!(SmtpMailSender::new(&config).is_ok());
    }
}
