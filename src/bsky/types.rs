// src/bsky/types.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Why a notification was generated, mirroring the wire `reason` field.
///
/// Categories the relay does not know about land on `Unknown` instead of
/// failing the whole list, so new server-side reasons keep flowing through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    Like,
    Repost,
    Follow,
    Mention,
    Reply,
    Quote,
    #[serde(other)]
    #[default]
    Unknown,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Like => "like",
            Reason::Repost => "repost",
            Reason::Follow => "follow",
            Reason::Mention => "mention",
            Reason::Reply => "reply",
            Reason::Quote => "quote",
            Reason::Unknown => "notification",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationAuthor {
    #[serde(default)]
    pub handle: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Subject record of a notification. Only the post text matters to the
/// relay; like/follow records simply have no `text` field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: Option<String>,
}

/// One entry of `app.bsky.notification.listNotifications`, newest-first.
/// Immutable once fetched; owned by the tick that fetched it.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// AT-URI identifying the notification subject; the dedup marker.
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub author: Option<NotificationAuthor>,
    #[serde(default)]
    pub reason: Reason,
    #[serde(default)]
    pub record: Option<PostRecord>,
    #[serde(rename = "indexedAt", default)]
    pub indexed_at: Option<DateTime<Utc>>,
}

/// Short-lived bearer credential from `createSession`. Acquired fresh on
/// every tick, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    #[serde(default)]
    pub did: String,
    #[serde(default)]
    pub handle: String,
}
