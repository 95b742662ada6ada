//! Domain entities - core business objects

mod message;
mod user;

pub use message::Message;
pub use user::{generate_verify_code, User, VERIFY_CODE_TTL_SECS};
