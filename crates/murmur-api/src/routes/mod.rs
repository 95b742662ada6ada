//! Route definitions
//!
//! Account and inbox endpoints mounted under /api, health probes at the root.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{account, health, inbox};
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Application endpoints
fn api_routes() -> Router<AppState> {
    Router::new().merge(account_routes()).merge(inbox_routes())
}

/// Account lifecycle routes
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(account::sign_up))
        .route("/verify-code", post(account::verify_code))
        .route("/sign-in", post(account::sign_in))
        .route("/sign-out", post(account::sign_out))
        .route(
            "/accept-messages",
            get(account::get_accept_status).post(account::set_accept_status),
        )
        .route("/delete-account", delete(account::delete_account))
}

/// Anonymous inbox routes
fn inbox_routes() -> Router<AppState> {
    Router::new()
        .route("/check-unique-username", get(inbox::check_unique_username))
        .route("/send-message", post(inbox::send_message))
        .route("/get-messages", get(inbox::get_messages))
        .route("/delete-message/:message_id", delete(inbox::delete_message))
}
