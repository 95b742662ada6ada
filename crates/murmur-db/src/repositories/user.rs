//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use murmur_core::{DomainError, RepoResult, Snowflake, User, UserRepository};

use crate::mappers::UserInsert;
use crate::models::UserModel;

use super::error::{map_db_error, map_user_unique_violation};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, password_hash, verify_code, verify_code_expiry,
                   is_verified, is_accepting_messages, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, password_hash, verify_code, verify_code_expiry,
                   is_verified, is_accepting_messages, created_at, updated_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, password_hash, verify_code, verify_code_expiry,
                   is_verified, is_accepting_messages, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            ",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, password_hash, verify_code, verify_code_expiry,
                   is_verified, is_accepting_messages, created_at, updated_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn verified_username_exists(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND is_verified)
            ",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let insert = UserInsert::new(user, password_hash);

        sqlx::query(
            r"
            INSERT INTO users (id, username, email, password_hash, verify_code,
                               verify_code_expiry, is_verified, is_accepting_messages,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(insert.id)
        .bind(insert.username)
        .bind(insert.email)
        .bind(insert.password_hash)
        .bind(insert.verify_code)
        .bind(insert.verify_code_expiry)
        .bind(insert.is_verified)
        .bind(insert.is_accepting_messages)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_unique_violation)?;

        Ok(())
    }

    #[instrument(skip(self, password_hash, verify_code))]
    async fn reclaim_unverified_by_email(
        &self,
        email: &str,
        password_hash: &str,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> RepoResult<Option<User>> {
        // The NOT is_verified guard makes the takeover atomic: a concurrent
        // verification wins and this returns no row.
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET password_hash = $2, verify_code = $3, verify_code_expiry = $4,
                updated_at = NOW()
            WHERE email = $1 AND NOT is_verified
            RETURNING id, username, email, password_hash, verify_code, verify_code_expiry,
                      is_verified, is_accepting_messages, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .bind(verify_code)
        .bind(verify_code_expiry)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn release_expired_username(&self, username: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM users
            WHERE username = $1 AND NOT is_verified AND verify_code_expiry < NOW()
            ",
        )
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn mark_verified(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET is_verified = TRUE, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_accepting_messages(
        &self,
        id: Snowflake,
        accepting: bool,
    ) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET is_accepting_messages = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, verify_code, verify_code_expiry,
                      is_verified, is_accepting_messages, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(accepting)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let result = sqlx::query_scalar::<_, String>(
            r"
            SELECT password_hash FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // ON DELETE CASCADE on messages.recipient_id clears the inbox too
        let result = sqlx::query(
            r"
            DELETE FROM users WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }

        Ok(())
    }
}
