//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in murmur-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod message;
mod user;

pub use message::PgMessageRepository;
pub use user::PgUserRepository;
