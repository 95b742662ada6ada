//! Mailer trait (port) - the domain's view of outbound verification email
//!
//! The account service only needs one capability from the email collaborator;
//! transport details (provider, API shape, retries) stay in infrastructure.

use async_trait::async_trait;

use crate::error::DomainError;

/// Result type for mailer operations
pub type MailResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Send the verification code for a pending registration
    async fn send_verification(
        &self,
        to_email: &str,
        username: &str,
        verify_code: &str,
    ) -> MailResult<()>;
}
