// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod bsky;
pub mod config;
pub mod error;
pub mod message;
pub mod notify;
pub mod watch;

// ---- Re-exports for stable public API ----
pub use crate::bsky::feed::{BskyNotificationSource, NotificationSource};
pub use crate::bsky::session::{BskySessionClient, SessionProvider};
pub use crate::bsky::types::{Notification, NotificationAuthor, PostRecord, Reason, Session};
pub use crate::config::RelayConfig;
pub use crate::error::RelayError;
pub use crate::message::format_notification;
pub use crate::notify::{DiscordNotifier, NotificationSink};
pub use crate::watch::{split_new, TickOutcome, Watcher};
