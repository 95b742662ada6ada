//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod account;
pub mod health;
pub mod inbox;
