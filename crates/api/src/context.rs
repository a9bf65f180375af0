use shelfwise_auth::AccessClaims;
use shelfwise_core::UserId;

/// Authenticated caller, derived from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    email: String,
    name: String,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, email: String, name: String) -> Self {
        Self { user_id, email, name }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&AccessClaims> for PrincipalContext {
    fn from(claims: &AccessClaims) -> Self {
        Self::new(claims.sub, claims.email.clone(), claims.name.clone())
    }
}
