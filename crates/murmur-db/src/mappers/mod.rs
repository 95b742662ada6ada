//! Entity to model mappers
//!
//! This module provides conversions between domain entities (murmur-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod message;
mod user;

pub use message::MessageInsert;
pub use user::UserInsert;
