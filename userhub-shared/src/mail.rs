/// Certification mail
///
/// Outbound delivery is behind the [`MailSender`] trait. [`LogMailSender`]
/// writes messages to the trace log; [`MemoryMailSender`] keeps them in an
/// outbox that tests can inspect.
///
/// # Example
///
/// ```
/// use userhub_shared::mail::{certification_message, verify_url};
///
/// let url = verify_url("http://localhost:8080", 7, "abc");
/// assert_eq!(url, "http://localhost:8080/api/users/7/verify?certificationCode=abc");
///
/// let message = certification_message("user@example.com", &url);
/// assert!(message.body.ends_with(&url));
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Subject line of the certification mail
pub const CERTIFICATION_SUBJECT: &str = "Please certify your email address";

/// An outbound plain-text mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Mail delivery errors
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The transport refused or failed to deliver the message
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound mail transport
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Delivers a single message
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mail sender that writes messages to the trace log instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        tracing::info!(
            target: "mail",
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Mail would be sent"
        );
        Ok(())
    }
}

/// Mail sender that keeps every message in memory
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailSender {
    outbox: Arc<Mutex<Vec<MailMessage>>>,
}

impl MemoryMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl MailSender for MemoryMailSender {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.outbox.lock().await.push(message);
        Ok(())
    }
}

/// Builds the certification link for a user
pub fn verify_url(public_base_url: &str, user_id: i64, certification_code: &str) -> String {
    format!(
        "{}/api/users/{}/verify?certificationCode={}",
        public_base_url.trim_end_matches('/'),
        user_id,
        certification_code
    )
}

/// Builds the mail asking `email` to follow `verify_url`
pub fn certification_message(email: &str, verify_url: &str) -> MailMessage {
    MailMessage {
        to: email.to_string(),
        subject: CERTIFICATION_SUBJECT.to_string(),
        body: format!(
            "Please click the following link to certify your email address: {}",
            verify_url
        ),
    }
}
