//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the database pool for readiness probes, and configuration.

use std::sync::Arc;

use murmur_common::{AppConfig, SessionService};
use murmur_db::PgPool;
use murmur_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Database pool, kept here so readiness probes can ping it directly
    pool: PgPool,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, pool: PgPool, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the session service from the service context
    pub fn session_service(&self) -> &SessionService {
        self.service_context.session_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}
