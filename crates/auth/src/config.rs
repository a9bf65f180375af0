//! Token issuance settings.

/// Upper bound accepted for `expiration_minutes` (one week).
pub const MAX_EXPIRATION_MINUTES: i64 = 7 * 24 * 60;

/// Upper bound accepted for `refresh_token_days` (ten years).
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 3650;

/// Settings used to sign, verify and age tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// `iss` claim.
    pub issuer: String,
    /// `aud` claim.
    pub audience: String,
    /// Absolute access-token lifetime in minutes (default: 120).
    pub expiration_minutes: i64,
    /// Sliding window in minutes (default: 60).
    pub sliding_expiration_minutes: i64,
    /// Refresh-token lifetime in days (default: 7).
    pub refresh_token_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "shelfwise".into(),
            audience: "shelfwise-clients".into(),
            expiration_minutes: 120,
            sliding_expiration_minutes: 60,
            refresh_token_days: 7,
        }
    }
}
