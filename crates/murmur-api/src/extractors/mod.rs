//! Axum extractors for request handling
//!
//! Custom extractors for session authentication and body validation.

mod auth;
mod validated;

pub use auth::SessionUser;
pub use validated::ValidatedJson;
