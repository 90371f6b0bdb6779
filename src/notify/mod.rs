pub mod discord;

use async_trait::async_trait;

use crate::error::RelayError;

/// Delivery seam for one rendered message.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, content: &str) -> Result<(), RelayError>;
}

pub use discord::DiscordNotifier;
