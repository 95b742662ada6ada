//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Wire names are
//! camelCase for the JavaScript client, and Snowflake IDs are serialized as
//! strings to survive JSON number precision.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Account Responses
// ============================================================================

/// Authenticated user as seen by its owner
///
/// Never carries the password hash or the pending verification code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
}

/// Sign-in response with the session token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl SignInResponse {
    pub fn new(token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            token,
            expires_in,
            user,
        }
    }
}

/// Current accepting-messages flag, read from the store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptStatusResponse {
    pub is_accepting_messages: bool,
}

/// Updated user snapshot after toggling the accepting-messages flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserResponse {
    pub updated_user: UserResponse,
}

// ============================================================================
// Inbox Responses
// ============================================================================

/// A single anonymous message in the owner's inbox
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The owner's inbox, newest message first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxResponse {
    pub messages: Vec<MessageResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            name: "murmur".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
