use crate::domain::model::Message;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Posts each message as JSON to a mail relay endpoint.
///
/// Body: `{"from", "to", "subject", "html"}`. Any non-2xx response is a
/// delivery failure for that recipient.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    endpoint: String,
    sender: String,
    api_key: Option<String>,
}

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            sender: sender.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn deliver(&self, recipient: &str, message: &Message) -> Result<()> {
        let payload = serde_json::json!({
            "from": self.sender,
            "to": recipient,
            "subject": message.subject,
            "html": message.html_body,
        });

        tracing::debug!("Posting message for {} to {}", recipient, self.endpoint);
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SantaError::DeliveryError {
                recipient: recipient.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Mail relay response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SantaError::DeliveryError {
                recipient: recipient.to_string(),
                message: format!("relay returned {}: {}", status, body.trim()),
            });
        }

        Ok(())
    }
}
