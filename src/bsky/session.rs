// src/bsky/session.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::bsky::types::Session;
use crate::bsky::DEFAULT_SERVICE_BASE;
use crate::error::{body_snippet, RelayError};

const CREATE_SESSION_PATH: &str = "/xrpc/com.atproto.server.createSession";

/// Exchanges long-lived credentials for a fresh access token.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn create_session(&self, identifier: &str, secret: &str)
        -> Result<Session, RelayError>;
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// Live `com.atproto.server.createSession` client.
#[derive(Clone)]
pub struct BskySessionClient {
    base: String,
    client: Client,
    timeout: Duration,
}

impl BskySessionClient {
    pub fn new() -> Self {
        Self::with_base(DEFAULT_SERVICE_BASE)
    }

    /// Point at a different PDS, mainly for tests and local servers.
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

impl Default for BskySessionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for BskySessionClient {
    async fn create_session(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Session, RelayError> {
        let url = format!("{}{}", self.base, CREATE_SESSION_PATH);
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&CreateSessionRequest {
                identifier,
                password: secret,
            })
            .send()
            .await
            .map_err(|e| RelayError::Auth(format!("createSession request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::Auth(format!("reading createSession response: {e}")))?;

        if !status.is_success() {
            return Err(RelayError::Auth(format!(
                "createSession returned {status}: {}",
                body_snippet(&body)
            )));
        }
        parse_session(&body)
    }
}

/// Extract the session from a `createSession` response body.
pub fn parse_session(body: &str) -> Result<Session, RelayError> {
    let session: Session = serde_json::from_str(body)
        .map_err(|e| RelayError::Auth(format!("malformed createSession response: {e}")))?;
    if session.access_jwt.is_empty() {
        return Err(RelayError::Auth(
            "createSession response carried an empty access token".into(),
        ));
    }
    Ok(session)
}
