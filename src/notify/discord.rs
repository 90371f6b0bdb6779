use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::NotificationSink;
use crate::error::{body_snippet, RelayError};

/// Posts messages to a fixed Discord webhook, one request per message.
#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

#[async_trait]
impl NotificationSink for DiscordNotifier {
    /// One POST, no retry; the watch loop decides whether to keep going.
    /// A non-2xx response body is captured as the diagnostic.
    async fn deliver(&self, content: &str) -> Result<(), RelayError> {
        let resp = self
            .client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(&WebhookPayload { content })
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("webhook request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Delivery(format!(
                "webhook returned {status}: {}",
                body_snippet(&body)
            )));
        }
        Ok(())
    }
}
