//! # murmur-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! outbound mailer port. This crate has zero dependencies on infrastructure
//! (database, web framework, email provider, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{generate_verify_code, Message, User, VERIFY_CODE_TTL_SECS};
pub use error::DomainError;
pub use traits::{MailResult, MessageRepository, RepoResult, UserRepository, VerificationMailer};
pub use value_objects::{
    is_valid_username, Snowflake, SnowflakeGenerator, SnowflakeParseError, USERNAME_MAX_CHARS,
    USERNAME_MIN_CHARS,
};
