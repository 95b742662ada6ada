//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Message, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by exact username, verified or not
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by username or email (sign-in identifier)
    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check whether a verified user holds this username
    ///
    /// Unverified registrations do not count; they are reclaimable.
    async fn verified_username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Reclaim an unverified registration holding this email
    ///
    /// Atomically overwrites the password hash and verification code, and
    /// restarts the expiry window, guarded by `NOT is_verified`. Returns the
    /// updated user, or `None` when the email has no unverified holder.
    async fn reclaim_unverified_by_email(
        &self,
        email: &str,
        password_hash: &str,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> RepoResult<Option<User>>;

    /// Delete an unverified registration whose code has expired
    ///
    /// Frees the username for re-registration. Returns true when a stale row
    /// was actually removed.
    async fn release_expired_username(&self, username: &str) -> RepoResult<bool>;

    /// Mark a user as verified
    async fn mark_verified(&self, id: Snowflake) -> RepoResult<()>;

    /// Set the accepting-messages flag, returning the updated user
    async fn set_accepting_messages(
        &self,
        id: Snowflake,
        accepting: bool,
    ) -> RepoResult<Option<User>>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Delete a user and, by cascade, every message they received
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a new message to its recipient's inbox
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// List a recipient's messages, newest first
    async fn find_by_recipient(&self, recipient_id: Snowflake) -> RepoResult<Vec<Message>>;

    /// Delete one message, scoped to its owner
    ///
    /// Returns false when nothing matched: the id is wrong, already deleted,
    /// or belongs to someone else. Callers cannot tell which, on purpose.
    async fn delete_owned(&self, recipient_id: Snowflake, message_id: Snowflake)
        -> RepoResult<bool>;

    /// Count messages in a recipient's inbox
    async fn count_by_recipient(&self, recipient_id: Snowflake) -> RepoResult<i64>;
}
