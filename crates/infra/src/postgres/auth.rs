use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use shelfwise_auth::otp::reset_token_expiry;
use shelfwise_auth::{
    PasswordResetOtp, PasswordResetOtpRepository, RefreshTokenRecord, RefreshTokenRepository, User,
    UserRepository,
};
use shelfwise_core::{OtpId, RefreshTokenId, StoreResult, UserId};

use super::map_sqlx_error;

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        user_type: row.try_get("user_type")?,
    })
}

fn otp_from_row(row: &PgRow) -> Result<PasswordResetOtp, sqlx::Error> {
    Ok(PasswordResetOtp {
        id: OtpId::from_uuid(row.try_get("id")?),
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        otp_code: row.try_get("otp_code")?,
        reset_token: row.try_get("reset_token")?,
        expires_at: row.try_get("expires_at")?,
        is_used: row.try_get("is_used")?,
        created_at: row.try_get("created_at")?,
    })
}

fn refresh_from_row(row: &PgRow) -> Result<RefreshTokenRecord, sqlx::Error> {
    Ok(RefreshTokenRecord {
        id: RefreshTokenId::from_uuid(row.try_get("id")?),
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        token_hash: row.try_get("token_hash")?,
        expires_at: row.try_get("expires_at")?,
        revoked_at: row.try_get("revoked_at")?,
        created_at: row.try_get("created_at")?,
    })
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, user_type";
const OTP_COLUMNS: &str = "id, user_id, otp_code, reset_token, expires_at, is_used, created_at";

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for PostgresUserStore {
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user", e))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_user", e))
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_user_by_email", e))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_user", e))
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("email_exists", e))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at, user_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.user_type)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    async fn update_password_hash(&self, id: UserId, password_hash: &str) -> StoreResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_password_hash", e))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PostgresOtpStore {
    pool: PgPool,
}

impl PostgresOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PasswordResetOtpRepository for PostgresOtpStore {
    #[instrument(skip(self, otp), fields(user_id = %otp.user_id), err)]
    async fn issue(&self, otp: &PasswordResetOtp) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("UPDATE password_reset_otps SET is_used = TRUE WHERE user_id = $1 AND is_used = FALSE")
            .bind(otp.user_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("supersede_otps", e))?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_otps (id, user_id, otp_code, reset_token, expires_at, is_used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(otp.id.as_uuid())
        .bind(otp.user_id.as_uuid())
        .bind(&otp.otp_code)
        .bind(&otp.reset_token)
        .bind(otp.expires_at)
        .bind(otp.is_used)
        .bind(otp.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_otp", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }

    /// The outer `is_used = FALSE` is re-checked after the row lock, so a
    /// concurrent redeem of the same row updates nothing.
    #[instrument(skip(self, code, reset_token), fields(user_id = %user_id), err)]
    async fn redeem(
        &self,
        user_id: UserId,
        code: &str,
        reset_token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<PasswordResetOtp>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE password_reset_otps
            SET is_used = TRUE, reset_token = $4, expires_at = $5
            WHERE is_used = FALSE AND id = (
                SELECT id FROM password_reset_otps
                WHERE user_id = $1 AND otp_code = $2 AND is_used = FALSE AND expires_at > $3
                ORDER BY created_at DESC
                LIMIT 1
            )
            RETURNING {OTP_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(code)
        .bind(now)
        .bind(reset_token)
        .bind(reset_token_expiry(now))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("redeem_otp", e))?;

        row.as_ref()
            .map(otp_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_otp", e))
    }

    #[instrument(skip(self, reset_token), fields(user_id = %user_id), err)]
    async fn consume_reset_token(&self, user_id: UserId, reset_token: &str, now: DateTime<Utc>) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE password_reset_otps
            SET reset_token = NULL
            WHERE user_id = $1 AND reset_token = $2 AND is_used = TRUE AND expires_at > $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(reset_token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("consume_reset_token", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone)]
pub struct PostgresRefreshTokenStore {
    pool: PgPool,
}

impl PostgresRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenStore {
    async fn insert(&self, record: &RefreshTokenRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, revoked_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_refresh_token", e))?;
        Ok(())
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token_hash, expires_at, revoked_at, created_at
            FROM refresh_tokens
            WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_refresh_token", e))?;

        row.as_ref()
            .map(refresh_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_refresh_token", e))
    }

    async fn revoke(&self, record: &RefreshTokenRecord, now: DateTime<Utc>) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE refresh_tokens SET revoked_at = $2 WHERE id = $1 AND revoked_at IS NULL")
            .bind(record.id.as_uuid())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("revoke_refresh_token", e))?;
        Ok(result.rows_affected() == 1)
    }
}
