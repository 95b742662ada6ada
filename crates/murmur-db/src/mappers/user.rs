//! User entity <-> model mapper

use murmur_core::{Snowflake, User};

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// The password hash stays in the database layer; entities never carry it.
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            verify_code: model.verify_code,
            verify_code_expiry: model.verify_code_expiry,
            is_verified: model.is_verified,
            is_accepting_messages: model.is_accepting_messages,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert User entity reference to values for database insertion
pub struct UserInsert<'a> {
    pub id: i64,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub verify_code: &'a str,
    pub verify_code_expiry: chrono::DateTime<chrono::Utc>,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: user.id.into_inner(),
            username: &user.username,
            email: &user.email,
            password_hash,
            verify_code: &user.verify_code,
            verify_code_expiry: user.verify_code_expiry,
            is_verified: user.is_verified,
            is_accepting_messages: user.is_accepting_messages,
        }
    }
}
