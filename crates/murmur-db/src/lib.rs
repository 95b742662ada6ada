//! # murmur-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `murmur-core`. It handles:
//!
//! - Connection pool management
//! - Schema migrations (embedded, run at startup)
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use murmur_db::pool::{create_pool, DatabaseConfig};
//! use murmur_db::repositories::PgUserRepository;
//! use murmur_core::UserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     murmur_db::migrations::run(&pool).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{PgMessageRepository, PgUserRepository};
