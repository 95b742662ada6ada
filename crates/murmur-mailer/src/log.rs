//! Log-only mailer for development and tests

use async_trait::async_trait;
use tracing::info;

use murmur_core::{MailResult, VerificationMailer};

/// Writes verification codes to the log instead of sending email
///
/// Used when no provider API key is configured, so the registration flow
/// stays exercisable on a laptop with nothing but the log output.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Create a new log-only mailer
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send_verification(
        &self,
        to_email: &str,
        username: &str,
        verify_code: &str,
    ) -> MailResult<()> {
        info!(
            email = %to_email,
            username = %username,
            code = %verify_code,
            "Verification code issued (log-only mailer)"
        );
        Ok(())
    }
}
