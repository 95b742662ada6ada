//! Value objects - immutable types and rules that represent domain concepts

mod snowflake;
mod username;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use username::{is_valid_username, USERNAME_MAX_CHARS, USERNAME_MIN_CHARS};
