//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names follow the JSON wire format (camelCase where it differs).

use std::borrow::Cow;

use murmur_core::{is_valid_username, USERNAME_MAX_CHARS, USERNAME_MIN_CHARS};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Wire-facing explanation of the username rules
pub const USERNAME_RULES: &str =
    "Username must be 3-16 characters: letters, numbers, underscores, and dots, \
     with no leading, trailing, or consecutive dots";

fn validate_username_format(username: &str) -> Result<(), ValidationError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message = Some(Cow::Borrowed(USERNAME_RULES));
        Err(err)
    }
}

// ============================================================================
// Account Requests
// ============================================================================

/// Sign-up (registration) request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(custom(function = validate_username_format))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Verification code submission
///
/// The username is looked up as given; a wrong one surfaces as not-found
/// rather than a format error, matching the sign-up redirect flow.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    pub username: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

/// Sign-in request; the identifier may be a username or an email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Toggle whether the caller's inbox accepts new messages
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AcceptMessagesRequest {
    #[serde(rename = "acceptMessages")]
    pub accept_messages: bool,
}

/// Account deletion confirmation
///
/// The client re-sends the username; it must match the authenticated account
/// exactly before anything is removed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "Username confirmation is required"))]
    pub username: String,
}

// ============================================================================
// Inbox Requests
// ============================================================================

/// Anonymous message submission to a user's public link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub username: String,

    #[validate(length(
        min = 8,
        max = 450,
        message = "Message content must be between 8 and 450 characters"
    ))]
    pub content: String,
}

/// Query string for the username availability check
#[derive(Debug, Clone, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}
