use chrono::{DateTime, Utc};

use shelfwise_auth::{
    PasswordResetOtp, PasswordResetOtpRepository, RefreshTokenRecord, RefreshTokenRepository, User,
    UserRepository,
};
use shelfwise_core::{StoreError, StoreResult, UserId};

use super::InMemoryTable;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: InMemoryTable<User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserStore {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        self.table.get(&id)
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.table.find(|u| u.email == email)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.table.find(|u| u.email == email)?.is_some())
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        self.table.write(|rows| {
            if rows.values().any(|u| u.email == user.email) {
                return Err(StoreError::conflict("users.email"));
            }
            rows.insert(user.id, user.clone());
            Ok(())
        })?
    }

    async fn update_password_hash(&self, id: UserId, password_hash: &str) -> StoreResult<()> {
        self.table.write(|rows| {
            if let Some(user) = rows.get_mut(&id) {
                user.password_hash = password_hash.to_string();
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    table: InMemoryTable<PasswordResetOtp>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PasswordResetOtpRepository for InMemoryOtpStore {
    async fn issue(&self, otp: &PasswordResetOtp) -> StoreResult<()> {
        self.table.write(|rows| {
            for row in rows.values_mut() {
                if row.user_id == otp.user_id && !row.is_used {
                    row.is_used = true;
                }
            }
            rows.insert(otp.id, otp.clone());
        })
    }

    async fn redeem(
        &self,
        user_id: UserId,
        code: &str,
        reset_token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<PasswordResetOtp>> {
        self.table.write(|rows| {
            let otp = rows
                .values_mut()
                .filter(|r| r.user_id == user_id && r.accepts_code(code, now))
                .max_by_key(|r| r.created_at)?;
            otp.redeem(reset_token.to_string(), now);
            Some(otp.clone())
        })
    }

    async fn consume_reset_token(&self, user_id: UserId, reset_token: &str, now: DateTime<Utc>) -> StoreResult<bool> {
        self.table.write(|rows| {
            match rows
                .values_mut()
                .find(|r| r.user_id == user_id && r.accepts_reset_token(reset_token, now))
            {
                Some(otp) => {
                    otp.reset_token = None;
                    true
                }
                None => false,
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    table: InMemoryTable<RefreshTokenRecord>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> StoreResult<()> {
        self.table.upsert(record.clone())
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<RefreshTokenRecord>> {
        self.table.find(|r| r.token_hash == token_hash && r.is_active(now))
    }

    async fn revoke(&self, record: &RefreshTokenRecord, now: DateTime<Utc>) -> StoreResult<bool> {
        self.table.write(|rows| match rows.get_mut(&record.id) {
            Some(row) if row.revoked_at.is_none() => {
                row.revoked_at = Some(now);
                true
            }
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryUserStore::new();
        let now = Utc::now();
        store.insert(&User::new("A", "a@x.com", "h", 0, now)).await.unwrap();

        let err = store
            .insert(&User::new("B", "a@x.com", "h", 0, now))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn issuing_supersedes_unused_otps_for_that_user_only() {
        let store = InMemoryOtpStore::new();
        let (alice, bob) = (UserId::new(), UserId::new());
        let now = Utc::now();

        store.issue(&PasswordResetOtp::issue(alice, "1111".into(), now)).await.unwrap();
        store.issue(&PasswordResetOtp::issue(bob, "2222".into(), now)).await.unwrap();
        store
            .issue(&PasswordResetOtp::issue(alice, "3333".into(), now + Duration::seconds(1)))
            .await
            .unwrap();

        assert!(store.redeem(alice, "1111", "t1", now).await.unwrap().is_none());
        assert!(store.redeem(alice, "3333", "t2", now).await.unwrap().is_some());
        assert!(store.redeem(bob, "2222", "t3", now).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn otp_and_reset_token_are_each_usable_once() {
        let store = InMemoryOtpStore::new();
        let user = UserId::new();
        let now = Utc::now();
        store.issue(&PasswordResetOtp::issue(user, "1234".into(), now)).await.unwrap();

        let redeemed = store.redeem(user, "1234", "token", now).await.unwrap().unwrap();
        assert!(redeemed.is_used);
        assert_eq!(redeemed.reset_token.as_deref(), Some("token"));
        assert!(store.redeem(user, "1234", "other", now).await.unwrap().is_none());

        assert!(!store.consume_reset_token(UserId::new(), "token", now).await.unwrap());
        assert!(store.consume_reset_token(user, "token", now).await.unwrap());
        assert!(!store.consume_reset_token(user, "token", now).await.unwrap());
    }

    #[tokio::test]
    async fn refresh_token_revokes_once() {
        let store = InMemoryRefreshTokenStore::new();
        let now = Utc::now();
        let record = RefreshTokenRecord::new(UserId::new(), "hash".into(), now + Duration::days(7), now);
        store.insert(&record).await.unwrap();

        assert!(store.find_active_by_hash("hash", now).await.unwrap().is_some());
        assert!(store.revoke(&record, now).await.unwrap());
        assert!(!store.revoke(&record, now).await.unwrap());
        assert!(store.find_active_by_hash("hash", now).await.unwrap().is_none());
    }
}
