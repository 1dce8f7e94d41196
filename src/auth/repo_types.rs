use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
///
/// `verify_otp`/`reset_otp` are `None` whenever no code is outstanding; the
/// paired expiry column is cleared together with the code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub is_account_verified: bool,
    pub verify_otp: Option<String>,
    pub verify_otp_expiry: Option<OffsetDateTime>,
    pub reset_otp: Option<String>,
    pub reset_otp_expiry: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}
