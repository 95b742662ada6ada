//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod account;
pub mod context;
pub mod error;
pub mod inbox;

// Re-export all services for convenience
pub use account::AccountService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use inbox::InboxService;
