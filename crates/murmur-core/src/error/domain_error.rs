//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// Display strings double as the user-facing envelope messages, so they are
/// worded for end users rather than operators.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotFound,

    #[error("Message not found or already deleted")]
    MessageNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid username format")]
    InvalidUsername,

    #[error("Invalid email format")]
    InvalidEmail,

    // =========================================================================
    // Verification Lifecycle
    // =========================================================================
    #[error("User is already verified")]
    AlreadyVerified,

    #[error("Verification code has expired, please sign up again")]
    VerificationExpired,

    #[error("Incorrect verification code")]
    IncorrectCode,

    // =========================================================================
    // Authentication
    // =========================================================================
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Please verify your account before signing in")]
    NotVerified,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username is already taken")]
    UsernameTaken,

    #[error("User already exists with this email")]
    EmailAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("User is not accepting messages")]
    NotAcceptingMessages,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Email dispatch error: {0}")]
    EmailError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound => "UNKNOWN_USER",
            Self::MessageNotFound => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",

            // Verification lifecycle
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::VerificationExpired => "CODE_EXPIRED",
            Self::IncorrectCode => "CODE_INCORRECT",

            // Authentication
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotVerified => "NOT_VERIFIED",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Business Rules
            Self::NotAcceptingMessages => "MESSAGES_CLOSED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::EmailError(_) => "EMAIL_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound | Self::MessageNotFound)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidUsername | Self::InvalidEmail
        )
    }

    /// Check if this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::NotVerified)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::EmailAlreadyExists)
    }

    /// Check if this is a rejected-but-well-formed business rule failure
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::AlreadyVerified
                | Self::VerificationExpired
                | Self::IncorrectCode
                | Self::NotAcceptingMessages
        )
    }

    /// Check if this wraps an infrastructure failure
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::EmailError(_) | Self::InternalError(_)
        )
    }
}
