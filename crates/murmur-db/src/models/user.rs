//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expiry: DateTime<Utc>,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModel {
    /// Check if the verification window has already closed
    #[inline]
    pub fn verification_expired(&self) -> bool {
        Utc::now() >= self.verify_code_expiry
    }
}
