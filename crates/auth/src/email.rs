use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("email delivery failed: {0}")]
pub struct EmailError(pub String);

/// Outbound mail used by the forgot-password flow.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_otp_email(&self, to: &str, otp_code: &str) -> Result<(), EmailError>;
}
