use crate::auth::repo_types::User;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, is_account_verified, \
     verify_otp, verify_otp_expiry, reset_otp, reset_otp_expiry, created_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Store a fresh account-verification OTP and its expiry.
    pub async fn store_verify_otp(
        db: &PgPool,
        id: Uuid,
        otp: &str,
        expiry: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET verify_otp = $2, verify_otp_expiry = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(otp)
        .bind(expiry)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Store a fresh password-reset OTP and its expiry.
    pub async fn store_reset_otp(
        db: &PgPool,
        id: Uuid,
        otp: &str,
        expiry: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_otp = $2, reset_otp_expiry = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(otp)
        .bind(expiry)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Atomically consume a verification OTP: marks the account verified and
    /// clears the code in one conditional update. Returns false when the code
    /// no longer matches (already consumed or expired), so of two concurrent
    /// callers with the same code at most one sees true.
    pub async fn consume_verify_otp(
        db: &PgPool,
        id: Uuid,
        otp: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_account_verified = TRUE, verify_otp = NULL, verify_otp_expiry = NULL
            WHERE id = $1 AND verify_otp = $2 AND verify_otp_expiry > $3
            "#,
        )
        .bind(id)
        .bind(otp)
        .bind(now)
        .execute(db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Atomically consume a reset OTP, swapping in the new password hash and
    /// clearing the code. Same compare-and-swap rule as verification.
    pub async fn consume_reset_otp(
        db: &PgPool,
        id: Uuid,
        otp: &str,
        new_password_hash: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $4, reset_otp = NULL, reset_otp_expiry = NULL
            WHERE id = $1 AND reset_otp = $2 AND reset_otp_expiry > $3
            "#,
        )
        .bind(id)
        .bind(otp)
        .bind(now)
        .bind(new_password_hash)
        .execute(db)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
