//! HTTPS email provider client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;

use murmur_core::{DomainError, MailResult, VerificationMailer};

/// JSON payload accepted by the provider's `/emails` endpoint
#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

/// Sends verification codes through an HTTPS email provider
///
/// The provider contract is the Resend-style `POST {base}/emails` with a
/// bearer API key; any compatible endpoint works.
pub struct HttpMailer {
    client: Client,
    api_base: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// Create a mailer targeting the given provider endpoint
    #[must_use]
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        let api_base = api_base.into();
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    fn render_html(username: &str, verify_code: &str) -> String {
        format!(
            "<p>Hello {username},</p>\
             <p>Your verification code is <strong>{verify_code}</strong>. \
             It expires in one hour.</p>\
             <p>If you did not request this code, you can ignore this email.</p>"
        )
    }
}

#[async_trait]
impl VerificationMailer for HttpMailer {
    #[instrument(skip(self, verify_code))]
    async fn send_verification(
        &self,
        to_email: &str,
        username: &str,
        verify_code: &str,
    ) -> MailResult<()> {
        let payload = EmailPayload {
            from: &self.from,
            to: [to_email],
            subject: "Murmur | Verification code",
            html: Self::render_html(username, verify_code),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::EmailError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::EmailError(format!(
                "provider returned {status}: {detail}"
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for HttpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailer")
            .field("api_base", &self.api_base)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}
