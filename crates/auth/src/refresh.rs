//! Persisted refresh-token records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, RefreshTokenId, UserId};

/// A refresh token as stored: only the SHA-256 hash of the opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(user_id: UserId, token_hash: String, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: RefreshTokenId::new(),
            user_id,
            token_hash,
            expires_at,
            revoked_at: None,
            created_at: now,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

impl Entity for RefreshTokenRecord {
    type Id = RefreshTokenId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
