use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::{EmailMessage, Notifier, NotifyError};

/// Sends mail through the Resend HTTP API.
pub struct ResendNotifier {
    client: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl ResendNotifier {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            from: from.into(),
            base_url: "https://api.resend.com".to_string(),
        }
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        debug!("Sending email");
        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": message.to,
                "subject": message.subject,
                "text": message.text,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }
        Ok(())
    }
}

/// Used when no mail provider is configured; messages only reach the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        info!(to = %message.to, subject = %message.subject, "Email delivery disabled; message logged");
        Ok(())
    }
}
