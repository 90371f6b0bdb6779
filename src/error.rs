// src/error.rs
// Typed errors at the tick boundary, so callers can tell failures that
// abort a whole tick (auth, fetch) apart from per-message ones (delivery).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Required configuration is missing or invalid. Fatal before the loop starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// The session handshake failed. The current tick is skipped.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The notification list could not be fetched or parsed. The current tick is skipped.
    #[error("notification fetch error: {0}")]
    Fetch(String),

    /// A single webhook delivery failed. The rest of the batch still runs.
    #[error("webhook delivery error: {0}")]
    Delivery(String),
}

/// Cap a response body captured into an error message.
pub(crate) fn body_snippet(s: &str) -> &str {
    match s.char_indices().nth(300) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
