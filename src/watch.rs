// src/watch.rs
// The fetch-diff-deliver cycle and the interval loop driving it.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::time::MissedTickBehavior;

use crate::bsky::feed::NotificationSource;
use crate::bsky::session::SessionProvider;
use crate::bsky::types::Notification;
use crate::error::RelayError;
use crate::message::format_notification;
use crate::notify::NotificationSink;

/// One-time metrics registration (so series show up for any installed recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("watch_ticks_total", "Watch ticks started.");
        describe_counter!(
            "watch_skipped_ticks_total",
            "Ticks aborted by a session or fetch failure."
        );
        describe_counter!("watch_sent_total", "Notifications relayed to the webhook.");
        describe_counter!(
            "watch_delivery_failures_total",
            "Webhook deliveries that failed."
        );
        describe_gauge!("watch_last_tick_ts", "Unix ts when the watcher last ticked.");
    });
}

/// Result of a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Session or fetch failed; nothing was delivered and the marker is untouched.
    Skipped(RelayError),
    /// The feed held nothing newer than the marker.
    NoNew,
    /// New notifications were relayed; some deliveries may still have failed.
    Delivered { sent: usize, failed: usize },
}

/// Orchestrates one account's notification watch: session per tick, fetch,
/// diff against the marker, deliver oldest-first.
pub struct Watcher {
    identifier: String,
    app_password: String,
    sessions: Box<dyn SessionProvider>,
    feed: Box<dyn NotificationSource>,
    sink: Box<dyn NotificationSink>,
}

impl Watcher {
    pub fn new(
        identifier: String,
        app_password: String,
        sessions: Box<dyn SessionProvider>,
        feed: Box<dyn NotificationSource>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            identifier,
            app_password,
            sessions,
            feed,
            sink,
        }
    }

    /// Run one fetch-diff-deliver cycle.
    ///
    /// Takes the previous marker and returns the next one together with the
    /// outcome, so the caller owns all loop state. The marker only moves
    /// when new notifications were found, and it moves before delivery: a
    /// webhook that keeps failing must not re-queue the same backlog on
    /// every tick.
    pub async fn tick(&self, marker: Option<String>) -> (Option<String>, TickOutcome) {
        ensure_metrics_described();
        counter!("watch_ticks_total").increment(1);
        gauge!("watch_last_tick_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let session = match self
            .sessions
            .create_session(&self.identifier, &self.app_password)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "tick skipped: session handshake failed");
                counter!("watch_skipped_ticks_total").increment(1);
                return (marker, TickOutcome::Skipped(e));
            }
        };
        tracing::debug!(handle = %session.handle, did = %session.did, "authenticated");

        let notifications = match self.feed.list_notifications(&session).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "tick skipped: notification fetch failed");
                counter!("watch_skipped_ticks_total").increment(1);
                return (marker, TickOutcome::Skipped(e));
            }
        };

        let fresh = split_new(&notifications, marker.as_deref());
        if fresh.is_empty() {
            tracing::info!("no new notifications");
            return (marker, TickOutcome::NoNew);
        }

        let next_marker = Some(fresh[0].uri.clone());

        // Deliver in chronological order, i.e. the reverse of feed order.
        let mut failed = 0usize;
        for n in fresh.iter().rev() {
            let message = format_notification(n);
            if let Err(e) = self.sink.deliver(&message).await {
                tracing::warn!(uri = %n.uri, error = %e, "delivery failed");
                counter!("watch_delivery_failures_total").increment(1);
                failed += 1;
            }
        }

        let sent = fresh.len() - failed;
        counter!("watch_sent_total").increment(sent as u64);
        tracing::info!(new = fresh.len(), sent, failed, "relayed new notifications");
        (next_marker, TickOutcome::Delivered { sent, failed })
    }

    /// Poll forever. The first tick fires immediately, later ones on the
    /// interval. Ticks are awaited serially on this task and missed ticks
    /// are delayed rather than bursted, so two ticks can never overlap.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut marker: Option<String> = None;
        loop {
            ticker.tick().await;
            let (next, _outcome) = self.tick(marker).await;
            marker = next;
        }
    }
}

/// Leading slice of the newest-first feed that is newer than the marker.
///
/// The scan stops at the first URI equal to the marker; that item and
/// everything after it were already forwarded. An unset marker classifies
/// the whole feed as new, so the first tick after startup replays whatever
/// the feed currently holds.
pub fn split_new<'a>(
    notifications: &'a [Notification],
    marker: Option<&str>,
) -> &'a [Notification] {
    let Some(marker) = marker else {
        return notifications;
    };
    let cut = notifications
        .iter()
        .position(|n| n.uri == marker)
        .unwrap_or(notifications.len());
    &notifications[..cut]
}
