//! Embedded schema migrations
//!
//! Migration files live in the workspace-level `migrations/` directory and
//! are compiled into the binary, so a fresh database is brought up to the
//! current schema on startup without external tooling.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Migrator embedding every file under the workspace `migrations/` directory
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any pending migrations
///
/// # Errors
/// Returns an error if a migration fails or the applied history conflicts
/// with the embedded files.
pub async fn run(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations complete");
    Ok(())
}
