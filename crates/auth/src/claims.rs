use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfwise_core::UserId;

/// Access-token claims as carried in the signed JWT.
///
/// `iat`/`exp` are Unix seconds so that the payload stays interoperable with
/// standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: UserId,

    pub email: String,
    pub name: String,

    /// Unique token id.
    pub jti: String,

    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,

    /// Sliding window in minutes; the client should refresh once the
    /// remaining lifetime falls inside it.
    pub sliding_expiration: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token is malformed or its signature does not verify")]
    Invalid,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature, issuer and audience checks happen while decoding (see `token`).
pub fn validate_claims(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Remaining lifetime when a token has entered its sliding window.
///
/// Returns `Some(remaining_minutes)` when `0 < remaining <= sliding_expiration`.
pub fn sliding_window_remaining(claims: &AccessClaims, now: DateTime<Utc>) -> Option<i64> {
    let remaining_secs = claims.exp - now.timestamp();
    if remaining_secs > 0 && remaining_secs <= claims.sliding_expiration * 60 {
        Some(remaining_secs / 60)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn claims(iat: i64, exp: i64, sliding: i64) -> AccessClaims {
        AccessClaims {
            sub: UserId::new(),
            email: "a@x.com".to_string(),
            name: "Alice".to_string(),
            jti: "j".to_string(),
            iat,
            exp,
            iss: "iss".to_string(),
            aud: "aud".to_string(),
            sliding_expiration: sliding,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn window_checks() {
        let c = claims(1_000, 2_000, 10);
        assert_eq!(validate_claims(&c, at(999)), Err(TokenValidationError::NotYetValid));
        assert_eq!(validate_claims(&c, at(1_000)), Ok(()));
        assert_eq!(validate_claims(&c, at(2_000)), Err(TokenValidationError::Expired));

        let inverted = claims(2_000, 2_000, 10);
        assert_eq!(
            validate_claims(&inverted, at(2_000)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn sliding_window_only_inside_threshold() {
        // 120 minute token, 60 minute sliding window.
        let c = claims(0, 120 * 60, 60);

        assert_eq!(sliding_window_remaining(&c, at(0)), None);
        assert_eq!(sliding_window_remaining(&c, at(59 * 60)), None);
        assert_eq!(sliding_window_remaining(&c, at(60 * 60)), Some(60));
        assert_eq!(sliding_window_remaining(&c, at(110 * 60 + 30)), Some(9));
        assert_eq!(sliding_window_remaining(&c, at(120 * 60)), None);
    }
}
