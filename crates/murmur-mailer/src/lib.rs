//! # murmur-mailer
//!
//! Implementations of the `VerificationMailer` port from `murmur-core`.
//!
//! - [`HttpMailer`] delivers codes through an HTTPS email provider
//! - [`LogMailer`] writes codes to the log, for development and tests

mod http;
mod log;

pub use http::HttpMailer;
pub use log::LogMailer;
