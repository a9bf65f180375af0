//! Registered user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, UserId};

/// A registered account.
///
/// `email` is always stored normalized (see [`normalize_email`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    /// Opaque account classifier supplied at registration.
    pub user_type: i32,
}

impl User {
    pub fn new(
        name: &str,
        email: &str,
        password_hash: impl Into<String>,
        user_type: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            created_at,
            user_type,
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Trim and lowercase an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
