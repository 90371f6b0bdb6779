// src/bsky/feed.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::bsky::types::{Notification, Session};
use crate::bsky::DEFAULT_SERVICE_BASE;
use crate::error::{body_snippet, RelayError};

const LIST_NOTIFICATIONS_PATH: &str = "/xrpc/app.bsky.notification.listNotifications";

/// Fetches the current notification feed, newest-first. Read-only; every
/// call is a fresh snapshot.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn list_notifications(&self, session: &Session)
        -> Result<Vec<Notification>, RelayError>;
}

/// Live `app.bsky.notification.listNotifications` client.
#[derive(Clone)]
pub struct BskyNotificationSource {
    base: String,
    client: Client,
    timeout: Duration,
}

impl BskyNotificationSource {
    pub fn new() -> Self {
        Self::with_base(DEFAULT_SERVICE_BASE)
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

impl Default for BskyNotificationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSource for BskyNotificationSource {
    async fn list_notifications(
        &self,
        session: &Session,
    ) -> Result<Vec<Notification>, RelayError> {
        let url = format!("{}{}", self.base, LIST_NOTIFICATIONS_PATH);
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .bearer_auth(&session.access_jwt)
            .send()
            .await
            .map_err(|e| RelayError::Fetch(format!("listNotifications request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::Fetch(format!("reading listNotifications response: {e}")))?;

        if !status.is_success() {
            return Err(RelayError::Fetch(format!(
                "listNotifications returned {status}: {}",
                body_snippet(&body)
            )));
        }
        parse_notifications(&body)
    }
}

#[derive(Deserialize)]
struct ListNotificationsResponse {
    notifications: Vec<Notification>,
}

/// Extract the notification list from a `listNotifications` response body.
/// A body without the `notifications` array counts as malformed.
pub fn parse_notifications(body: &str) -> Result<Vec<Notification>, RelayError> {
    let parsed: ListNotificationsResponse = serde_json::from_str(body)
        .map_err(|e| RelayError::Fetch(format!("malformed listNotifications response: {e}")))?;
    Ok(parsed.notifications)
}
