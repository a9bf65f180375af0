use thiserror::Error;

use shelfwise_core::StoreError;

use crate::claims::TokenValidationError;
use crate::email::EmailError;

/// Failures surfaced by the Credential Manager.
///
/// `Display` is the message shown to API callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Validation failed.")]
    ValidationFailed(Vec<String>),

    #[error("An account with this email already exists.")]
    DuplicateEmail,

    // Same text for unknown email and wrong password.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("User not found.")]
    NotFound,

    #[error("Old password is incorrect.")]
    WrongOldPassword,

    #[error("New password and confirm password do not match.")]
    PasswordMismatch,

    #[error("Invalid or expired OTP.")]
    InvalidOtp,

    #[error("Invalid or expired reset token.")]
    InvalidResetToken,

    #[error("Invalid or expired refresh token.")]
    InvalidRefreshToken,

    #[error("Token could not be issued.")]
    Token(#[from] TokenValidationError),

    #[error("An unexpected storage error occurred.")]
    Storage(#[from] StoreError),

    #[error("Failed to send OTP email.")]
    EmailDeliveryFailure(String),
}

impl CredentialError {
    /// HTTP-style status code for the error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed(_)
            | Self::WrongOldPassword
            | Self::PasswordMismatch
            | Self::InvalidOtp
            | Self::InvalidResetToken => 400,
            Self::InvalidCredentials | Self::InvalidRefreshToken => 401,
            Self::NotFound => 404,
            Self::DuplicateEmail => 409,
            Self::Token(_) | Self::Storage(_) | Self::EmailDeliveryFailure(_) => 500,
        }
    }

    /// Field-level messages, if any.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed(errors) => errors.clone(),
            Self::EmailDeliveryFailure(reason) => vec![reason.clone()],
            _ => Vec::new(),
        }
    }
}

impl From<EmailError> for CredentialError {
    fn from(value: EmailError) -> Self {
        Self::EmailDeliveryFailure(value.0)
    }
}
