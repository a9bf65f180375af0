//! Credential Manager: registration, login, token renewal and password recovery.

use std::sync::Arc;

use chrono::Utc;

use shelfwise_core::{StoreError, UserId};

use crate::email::EmailSender;
use crate::error::CredentialError;
use crate::otp::{PasswordResetOtp, generate_otp_code, generate_reset_token};
use crate::password::{MIN_PASSWORD_LEN, hash_password, verify_password};
use crate::refresh::RefreshTokenRecord;
use crate::repository::{PasswordResetOtpRepository, RefreshTokenRepository, UserRepository};
use crate::token::{TokenService, generate_refresh_token, hash_refresh_token};
use crate::user::{User, normalize_email};

/// Message returned by forgot-password whether or not the email is known.
pub const FORGOT_PASSWORD_MESSAGE: &str = "If the email exists, an OTP has been sent.";

/// Input for [`CredentialManager::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: i32,
}

/// Tokens handed out on login and renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// Successful login: tokens plus the profile the client displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub name: String,
    pub email: String,
    pub user_type: i32,
}

/// Credential Manager service.
///
/// Stateless between calls; all state lives in the repositories.
#[derive(Clone)]
pub struct CredentialManager {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn PasswordResetOtpRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    email: Arc<dyn EmailSender>,
    tokens: TokenService,
}

impl CredentialManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn PasswordResetOtpRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        email: Arc<dyn EmailSender>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            otps,
            refresh_tokens,
            email,
            tokens,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn register(&self, input: Registration) -> Result<UserId, CredentialError> {
        let mut errors = Vec::new();
        if input.name.trim().is_empty() {
            errors.push("Name is required.".to_string());
        }
        if !input.email.contains('@') {
            errors.push("A valid email is required.".to_string());
        }
        if let Some(e) = password_length_error(&input.password) {
            errors.push(e);
        }
        if !errors.is_empty() {
            return Err(CredentialError::ValidationFailed(errors));
        }

        let email = normalize_email(&input.email);
        if self.users.email_exists(&email).await? {
            return Err(CredentialError::DuplicateEmail);
        }

        let user = User::new(
            &input.name,
            &email,
            hash_password(&input.password),
            input.user_type,
            Utc::now(),
        );

        match self.users.insert(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration.
            Err(StoreError::Conflict(_)) => return Err(CredentialError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, CredentialError> {
        let email = normalize_email(email);
        let Some(user) = self.users.get_by_email(&email).await? else {
            return Err(CredentialError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "login rejected");
            return Err(CredentialError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(&user).await?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome {
            tokens,
            name: user.name,
            email: user.email,
            user_type: user.user_type,
        })
    }

    /// Exchange a (possibly expired) access token plus a refresh token for a new pair.
    ///
    /// The presented refresh token is revoked; it cannot be used twice.
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> Result<TokenPair, CredentialError> {
        let claims = self
            .tokens
            .decode_ignoring_expiry(access_token)
            .map_err(|_| CredentialError::InvalidRefreshToken)?;

        let now = Utc::now();
        let hash = hash_refresh_token(refresh_token);
        let record = self
            .refresh_tokens
            .find_active_by_hash(&hash, now)
            .await?
            .filter(|r| r.user_id == claims.sub)
            .ok_or(CredentialError::InvalidRefreshToken)?;

        if !self.refresh_tokens.revoke(&record, now).await? {
            return Err(CredentialError::InvalidRefreshToken);
        }

        let user = self
            .users
            .get_by_id(claims.sub)
            .await?
            .ok_or(CredentialError::InvalidRefreshToken)?;

        let tokens = self.issue_tokens(&user).await?;
        tracing::info!(user_id = %user.id, "refresh token rotated");
        Ok(tokens)
    }

    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), CredentialError> {
        let user = self.users.get_by_id(user_id).await?.ok_or(CredentialError::NotFound)?;

        if !verify_password(old_password, &user.password_hash) {
            return Err(CredentialError::WrongOldPassword);
        }
        if new_password != confirm_password {
            return Err(CredentialError::PasswordMismatch);
        }
        if let Some(e) = password_length_error(new_password) {
            return Err(CredentialError::ValidationFailed(vec![e]));
        }

        self.users
            .update_password_hash(user.id, &hash_password(new_password))
            .await?;
        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }

    /// Start password recovery.
    ///
    /// Succeeds silently for unknown emails; callers always answer with
    /// [`FORGOT_PASSWORD_MESSAGE`].
    pub async fn forgot_password(&self, email: &str) -> Result<(), CredentialError> {
        let email = normalize_email(email);
        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(());
        };

        let otp = PasswordResetOtp::issue(user.id, generate_otp_code(), Utc::now());
        self.otps.issue(&otp).await?;

        self.email.send_otp_email(&user.email, &otp.otp_code).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "otp email delivery failed");
            CredentialError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "password reset otp issued");
        Ok(())
    }

    /// Trade a valid OTP for a short-lived reset token.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String, CredentialError> {
        let email = normalize_email(email);
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(CredentialError::InvalidOtp)?;

        let reset_token = generate_reset_token();
        self.otps
            .redeem(user.id, code.trim(), &reset_token, Utc::now())
            .await?
            .ok_or(CredentialError::InvalidOtp)?;

        tracing::info!(user_id = %user.id, "password reset otp verified");
        Ok(reset_token)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), CredentialError> {
        if let Some(e) = password_length_error(new_password) {
            return Err(CredentialError::ValidationFailed(vec![e]));
        }

        let email = normalize_email(email);
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(CredentialError::InvalidResetToken)?;

        // Burn the token before touching the password so it cannot be replayed.
        if !self.otps.consume_reset_token(user.id, reset_token, Utc::now()).await? {
            return Err(CredentialError::InvalidResetToken);
        }

        self.users
            .update_password_hash(user.id, &hash_password(new_password))
            .await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }

    async fn issue_tokens(&self, user: &User) -> Result<TokenPair, CredentialError> {
        let now = Utc::now();
        let access = self.tokens.issue_access_token(user, now)?;

        let refresh_token = generate_refresh_token();
        let record = RefreshTokenRecord::new(
            user.id,
            hash_refresh_token(&refresh_token),
            self.tokens.refresh_token_expiry(now),
            now,
        );
        self.refresh_tokens.insert(&record).await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token,
            expires_in: self.tokens.expires_in_secs(),
        })
    }
}

fn password_length_error(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LEN)
        .then(|| format!("Password must be at least {MIN_PASSWORD_LEN} characters."))
}
