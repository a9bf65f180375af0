//! Credential Manager: accounts, tokens and password recovery.
//!
//! Registration, login, token issuance and renewal, password change and
//! OTP-based password recovery. Storage and mail delivery are reached through
//! the traits in [`repository`] and [`email`]; adapters live in `shelfwise-infra`.

pub mod claims;
pub mod config;
pub mod email;
pub mod error;
pub mod otp;
pub mod password;
pub mod refresh;
pub mod repository;
pub mod service;
pub mod token;
pub mod user;

pub use claims::{AccessClaims, TokenValidationError, sliding_window_remaining, validate_claims};
pub use config::TokenConfig;
pub use email::{EmailError, EmailSender};
pub use error::CredentialError;
pub use otp::PasswordResetOtp;
pub use refresh::RefreshTokenRecord;
pub use repository::{PasswordResetOtpRepository, RefreshTokenRepository, UserRepository};
pub use service::{CredentialManager, FORGOT_PASSWORD_MESSAGE, LoginOutcome, Registration, TokenPair};
pub use token::{AccessTokenValidator, IssuedAccessToken, TokenService};
pub use user::{User, normalize_email};
