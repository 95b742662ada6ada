//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use murmur_common::{AppConfig, AppError, SessionService};
use murmur_core::traits::VerificationMailer;
use murmur_core::SnowflakeGenerator;
use murmur_db::{create_pool, PgMessageRepository, PgUserRepository};
use murmur_mailer::{HttpMailer, LogMailer};
use murmur_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        Duration::from_secs(state.config().server.request_timeout_secs),
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = murmur_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: Duration::from_secs(config.database.acquire_timeout_secs),
        ..Default::default()
    };
    let pool = create_pool(&db_config).await.map_err(|e| {
        AppError::internal(anyhow::anyhow!("Failed to connect to PostgreSQL: {e}"))
    })?;
    info!("PostgreSQL connection established");

    // Apply pending migrations
    murmur_db::migrations::run(&pool)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Migration failed: {e}")))?;

    // Create session service
    let session_service = Arc::new(SessionService::new(
        &config.session.secret,
        config.session.ttl_secs,
    ));

    // Create Snowflake generator
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    // Create repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(pool.clone()));

    // Pick the outbound mailer: the HTTPS provider when an API key is
    // configured, the log-only sender otherwise
    let mailer: Arc<dyn VerificationMailer> = match &config.mailer.api_key {
        Some(api_key) => {
            info!(api_base = %config.mailer.api_base, "Using HTTPS mailer");
            Arc::new(HttpMailer::new(
                config.mailer.api_base.clone(),
                api_key.clone(),
                config.mailer.from.clone(),
            ))
        }
        None => {
            info!("No mailer API key configured, verification codes go to the log");
            Arc::new(LogMailer::new())
        }
    };

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .user_repo(user_repo)
        .message_repo(message_repo)
        .mailer(mailer)
        .session_service(session_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(AppError::from)?;

    Ok(AppState::new(service_context, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid server address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
