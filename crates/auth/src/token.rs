//! HS256 access tokens and opaque refresh tokens.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::claims::{AccessClaims, TokenValidationError, validate_claims};
use crate::config::TokenConfig;
use crate::user::User;

const REFRESH_TOKEN_BYTES: usize = 64;

/// Verifies a bearer token and returns its claims.
///
/// The API middleware depends on this seam rather than on `TokenService`
/// so tests can plug in fixed principals.
pub trait AccessTokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenValidationError>;
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub claims: AccessClaims,
}

/// Signs and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding = DecodingKey::from_secret(config.secret.as_bytes());
        Self { config, encoding, decoding }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Access-token lifetime in seconds, as reported to clients in `expiresIn`.
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expiration_minutes.saturating_mul(60)
    }

    /// Saturates at the latest representable instant instead of overflowing.
    pub fn refresh_token_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(self.config.refresh_token_days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn issue_access_token(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, TokenValidationError> {
        let iat = now.timestamp();
        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            jti: Uuid::now_v7().to_string(),
            iat,
            exp: iat.saturating_add(self.expires_in_secs()),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            sliding_expiration: self.config.sliding_expiration_minutes,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenValidationError::Invalid)?;

        Ok(IssuedAccessToken { token, claims })
    }

    /// Verify signature, issuer and audience without looking at `exp`.
    ///
    /// Used by the refresh flow, where the access token is expected to be stale.
    pub fn decode_ignoring_expiry(&self, token: &str) -> Result<AccessClaims, TokenValidationError> {
        let mut validation = self.validation();
        validation.validate_exp = false;
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenValidationError::Invalid)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);
        validation
    }
}

impl AccessTokenValidator for TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenValidationError> {
        // Expiry is checked against the caller's clock so tests stay deterministic.
        let claims = self.decode_ignoring_expiry(token)?;
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

/// Generate an opaque refresh token: 64 CSPRNG bytes, standard base64.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// SHA-256 of a raw refresh token, hex-encoded. Only this value is stored.
pub fn hash_refresh_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
