//! One-time passcodes and reset tokens for the forgot-password flow.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, OtpId, UserId};

/// How long an emailed OTP stays valid.
pub const OTP_TTL_MINUTES: i64 = 10;

/// How long a reset token stays valid after the OTP was verified.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

const RESET_TOKEN_BYTES: usize = 32;

/// A password-reset OTP row.
///
/// Lifecycle: issued (unused) -> used (verified or superseded) -> reset token
/// cleared once consumed by a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetOtp {
    pub id: OtpId,
    pub user_id: UserId,
    pub otp_code: String,
    pub reset_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetOtp {
    pub fn issue(user_id: UserId, otp_code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: OtpId::new(),
            user_id,
            otp_code,
            reset_token: None,
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
            is_used: false,
            created_at: now,
        }
    }

    /// Unused, unexpired and matching the given code.
    pub fn accepts_code(&self, code: &str, now: DateTime<Utc>) -> bool {
        !self.is_used && self.expires_at > now && self.otp_code == code
    }

    /// Verified, unexpired and holding the given reset token.
    pub fn accepts_reset_token(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.is_used && self.expires_at > now && self.reset_token.as_deref() == Some(token)
    }

    /// Consume the OTP and attach a reset token valid for fifteen minutes.
    pub fn redeem(&mut self, reset_token: String, now: DateTime<Utc>) {
        self.is_used = true;
        self.reset_token = Some(reset_token);
        self.expires_at = reset_token_expiry(now);
    }
}

impl Entity for PasswordResetOtp {
    type Id = OtpId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// When a reset token handed out at `now` stops being accepted.
pub fn reset_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(RESET_TOKEN_TTL_MINUTES)
}

/// Four-digit code drawn uniformly from `1000..=9999`.
pub fn generate_otp_code() -> String {
    rand::rng().random_range(1000..=9999).to_string()
}

/// 32 CSPRNG bytes, standard base64.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}
