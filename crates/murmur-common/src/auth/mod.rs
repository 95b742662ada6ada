//! Authentication utilities

mod password;
mod session;

pub use password::{hash_password, verify_password};
pub use session::{IssuedSession, SessionClaims, SessionService, SESSION_COOKIE};
