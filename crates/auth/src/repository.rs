//! Storage seams for the Credential Manager.
//!
//! Implementations live in `shelfwise-infra` (in-memory and PostgreSQL).

use chrono::{DateTime, Utc};

use shelfwise_core::{StoreResult, UserId};

use crate::otp::PasswordResetOtp;
use crate::refresh::RefreshTokenRecord;
use crate::user::User;

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Lookup by an already-normalized email.
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Insert a new user. A duplicate email reports `StoreError::Conflict`.
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn update_password_hash(&self, id: UserId, password_hash: &str) -> StoreResult<()>;
}

#[async_trait::async_trait]
pub trait PasswordResetOtpRepository: Send + Sync {
    /// Mark every unused OTP of the user as used, then insert `otp`, as one unit.
    async fn issue(&self, otp: &PasswordResetOtp) -> StoreResult<()>;

    /// Atomically redeem the newest unused, unexpired OTP of the user with
    /// exactly this code: mark it used and attach `reset_token`.
    ///
    /// Returns the redeemed row, or `None` when nothing matched. Two concurrent
    /// calls with the same code never both succeed.
    async fn redeem(
        &self,
        user_id: UserId,
        code: &str,
        reset_token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<PasswordResetOtp>>;

    /// Atomically clear a verified, unexpired reset token of the user.
    ///
    /// Returns `false` when the token was unknown, expired or already consumed.
    async fn consume_reset_token(&self, user_id: UserId, reset_token: &str, now: DateTime<Utc>) -> StoreResult<bool>;
}

#[async_trait::async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, record: &RefreshTokenRecord) -> StoreResult<()>;

    /// Unrevoked, unexpired record with this hash.
    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<RefreshTokenRecord>>;

    /// Revoke if still active. Returns `false` when someone else revoked it first.
    async fn revoke(&self, record: &RefreshTokenRecord, now: DateTime<Utc>) -> StoreResult<bool>;
}
