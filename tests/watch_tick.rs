// tests/watch_tick.rs
// Tick semantics driven through scripted fakes at the three seams.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use bsky_webhook_relay::bsky::feed::NotificationSource;
use bsky_webhook_relay::bsky::session::SessionProvider;
use bsky_webhook_relay::bsky::types::{
    Notification, NotificationAuthor, PostRecord, Session,
};
use bsky_webhook_relay::notify::NotificationSink;
use bsky_webhook_relay::{Reason, RelayError, TickOutcome, Watcher};

fn post(tail: &str, text: &str) -> Notification {
    Notification {
        uri: format!("at://did:plc:writer/app.bsky.feed.post/{tail}"),
        author: Some(NotificationAuthor {
            handle: "writer.bsky.social".to_string(),
            display_name: None,
        }),
        reason: Reason::Reply,
        record: Some(PostRecord {
            text: Some(text.to_string()),
        }),
        indexed_at: None,
    }
}

fn uri(tail: &str) -> String {
    format!("at://did:plc:writer/app.bsky.feed.post/{tail}")
}

struct StaticSession;

#[async_trait]
impl SessionProvider for StaticSession {
    async fn create_session(
        &self,
        _identifier: &str,
        _secret: &str,
    ) -> Result<Session, RelayError> {
        Ok(Session {
            access_jwt: "jwt.fixture".to_string(),
            did: "did:plc:watcher".to_string(),
            handle: "watcher.bsky.social".to_string(),
        })
    }
}

struct FailingSession;

#[async_trait]
impl SessionProvider for FailingSession {
    async fn create_session(
        &self,
        _identifier: &str,
        _secret: &str,
    ) -> Result<Session, RelayError> {
        Err(RelayError::Auth(
            "createSession returned 401 Unauthorized: bad app password".to_string(),
        ))
    }
}

struct StaticFeed(Vec<Notification>);

#[async_trait]
impl NotificationSource for StaticFeed {
    async fn list_notifications(
        &self,
        _session: &Session,
    ) -> Result<Vec<Notification>, RelayError> {
        Ok(self.0.clone())
    }
}

struct FailingFeed;

#[async_trait]
impl NotificationSource for FailingFeed {
    async fn list_notifications(
        &self,
        _session: &Session,
    ) -> Result<Vec<Notification>, RelayError> {
        Err(RelayError::Fetch(
            "listNotifications returned 502 Bad Gateway".to_string(),
        ))
    }
}

/// Records every delivery attempt; optionally fails messages containing a
/// given substring.
#[derive(Default)]
struct RecordingSink {
    attempts: Arc<Mutex<Vec<String>>>,
    fail_if_contains: Option<String>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, content: &str) -> Result<(), RelayError> {
        self.attempts.lock().push(content.to_string());
        if let Some(needle) = &self.fail_if_contains {
            if content.contains(needle.as_str()) {
                return Err(RelayError::Delivery(
                    "webhook returned 500 Internal Server Error".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn watcher(
    sessions: Box<dyn SessionProvider>,
    feed: Box<dyn NotificationSource>,
    sink: Box<dyn NotificationSink>,
) -> Watcher {
    Watcher::new(
        "watcher.bsky.social".to_string(),
        "abcd-efgh-ijkl-mnop".to_string(),
        sessions,
        feed,
        sink,
    )
}

#[tokio::test]
async fn cold_start_relays_whole_feed_oldest_first() {
    let sink = RecordingSink::default();
    let attempts = sink.attempts.clone();
    let feed = StaticFeed(vec![
        post("ccc", "third post"),
        post("bbb", "second post"),
        post("aaa", "first post"),
    ]);
    let w = watcher(Box::new(StaticSession), Box::new(feed), Box::new(sink));

    let (marker, outcome) = w.tick(None).await;

    assert_eq!(marker.as_deref(), Some(uri("ccc").as_str()));
    assert!(matches!(outcome, TickOutcome::Delivered { sent: 3, failed: 0 }));

    let sent = attempts.lock();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].contains("first post"));
    assert!(sent[1].contains("second post"));
    assert!(sent[2].contains("third post"));
}

#[tokio::test]
async fn marker_mid_feed_relays_only_newer_items() {
    let sink = RecordingSink::default();
    let attempts = sink.attempts.clone();
    let feed = StaticFeed(vec![
        post("ddd", "fourth post"),
        post("ccc", "third post"),
        post("bbb", "second post"),
        post("aaa", "first post"),
    ]);
    let w = watcher(Box::new(StaticSession), Box::new(feed), Box::new(sink));

    let (marker, outcome) = w.tick(Some(uri("bbb"))).await;

    assert_eq!(marker.as_deref(), Some(uri("ddd").as_str()));
    assert!(matches!(outcome, TickOutcome::Delivered { sent: 2, failed: 0 }));

    let sent = attempts.lock();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("third post"));
    assert!(sent[1].contains("fourth post"));
}

#[tokio::test]
async fn marker_at_feed_head_means_no_new() {
    let sink = RecordingSink::default();
    let attempts = sink.attempts.clone();
    let feed = StaticFeed(vec![post("ccc", "third post"), post("bbb", "second post")]);
    let w = watcher(Box::new(StaticSession), Box::new(feed), Box::new(sink));

    let (marker, outcome) = w.tick(Some(uri("ccc"))).await;

    assert_eq!(marker.as_deref(), Some(uri("ccc").as_str()));
    assert!(matches!(outcome, TickOutcome::NoNew));
    assert!(attempts.lock().is_empty());
}

#[tokio::test]
async fn auth_failure_skips_tick_without_touching_anything() {
    let sink = RecordingSink::default();
    let attempts = sink.attempts.clone();
    let feed = StaticFeed(vec![post("ccc", "third post")]);
    let w = watcher(Box::new(FailingSession), Box::new(feed), Box::new(sink));

    let (marker, outcome) = w.tick(Some(uri("bbb"))).await;

    assert_eq!(marker.as_deref(), Some(uri("bbb").as_str()));
    assert!(matches!(outcome, TickOutcome::Skipped(RelayError::Auth(_))));
    assert!(attempts.lock().is_empty());
}

#[tokio::test]
async fn fetch_failure_skips_tick_and_keeps_marker() {
    let sink = RecordingSink::default();
    let attempts = sink.attempts.clone();
    let w = watcher(Box::new(StaticSession), Box::new(FailingFeed), Box::new(sink));

    let (marker, outcome) = w.tick(Some(uri("aaa"))).await;

    assert_eq!(marker.as_deref(), Some(uri("aaa").as_str()));
    assert!(matches!(outcome, TickOutcome::Skipped(RelayError::Fetch(_))));
    assert!(attempts.lock().is_empty());
}

#[tokio::test]
async fn one_failed_delivery_does_not_stop_the_batch_or_the_marker() {
    let sink = RecordingSink {
        attempts: Arc::new(Mutex::new(Vec::new())),
        fail_if_contains: Some("second post".to_string()),
    };
    let attempts = sink.attempts.clone();
    let feed = StaticFeed(vec![
        post("ccc", "third post"),
        post("bbb", "second post"),
        post("aaa", "first post"),
    ]);
    let w = watcher(Box::new(StaticSession), Box::new(feed), Box::new(sink));

    let (marker, outcome) = w.tick(Some(uri("aaa"))).await;

    // Both new items were attempted even though the first one failed,
    // and the marker reflects the newest regardless.
    assert_eq!(marker.as_deref(), Some(uri("ccc").as_str()));
    assert!(matches!(outcome, TickOutcome::Delivered { sent: 1, failed: 1 }));
    assert_eq!(attempts.lock().len(), 2);
}
