//! Inbox handlers
//!
//! Endpoints for anonymous message submission, the owner's inbox, and the
//! public username availability check.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use murmur_core::Snowflake;
use murmur_service::{InboxResponse, InboxService, SendMessageRequest, UsernameQuery};

use crate::extractors::{SessionUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Envelope};
use crate::state::AppState;

/// Deliver an anonymous message to a user's inbox
///
/// POST /api/send-message
pub async fn send_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Envelope> {
    let service = InboxService::new(state.service_context());
    service.submit_message(request).await?;
    Ok(Envelope::ok("Message sent successfully"))
}

/// List the caller's messages, newest first
///
/// GET /api/get-messages
pub async fn get_messages(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Envelope<InboxResponse>> {
    let service = InboxService::new(state.service_context());
    let messages = service.list_messages(session.user_id).await?;
    let response = InboxResponse {
        messages: messages.into_iter().map(Into::into).collect(),
    };
    Ok(Envelope::ok_with("Messages retrieved successfully", response))
}

/// Delete one of the caller's own messages
///
/// DELETE /api/delete-message/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    session: SessionUser,
    Path(message_id): Path<String>,
) -> ApiResult<Envelope> {
    let message_id: Snowflake = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = InboxService::new(state.service_context());
    service.delete_message(session.user_id, message_id).await?;
    Ok(Envelope::ok("Message deleted"))
}

/// Report whether a username is free to register
///
/// GET /api/check-unique-username?username=
///
/// Both outcomes are 200; `success` carries the verdict.
pub async fn check_unique_username(
    State(state): State<AppState>,
    query: Result<Query<UsernameQuery>, QueryRejection>,
) -> ApiResult<Envelope> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = InboxService::new(state.service_context());
    let available = service.check_username_available(&query.username).await?;

    if available {
        Ok(Envelope::ok("Username is available"))
    } else {
        Ok(Envelope::rejected("Username is already taken"))
    }
}
