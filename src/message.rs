// src/message.rs
// Rendering of one notification into the webhook message text.

use crate::bsky::types::Notification;

const MISSING_TEXT: &str = "(no content)";
const MISSING_AUTHOR: &str = "anonymous";

/// Render a notification as Discord-flavored markdown.
///
/// Total over its input: a missing author, body text, or URI degrades to a
/// placeholder (or drops the permalink line) instead of failing.
pub fn format_notification(n: &Notification) -> String {
    let author = n
        .author
        .as_ref()
        .map(|a| a.handle.as_str())
        .filter(|h| !h.is_empty())
        .unwrap_or(MISSING_AUTHOR);
    let text = n
        .record
        .as_ref()
        .and_then(|r| r.text.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or(MISSING_TEXT);

    let mut out = format!("🔔 **{}** by `{}`", n.reason, author);
    if let Some(url) = permalink(&n.uri, author) {
        out.push('\n');
        out.push('<');
        out.push_str(&url);
        out.push('>');
    }
    out.push_str("\n> ");
    out.push_str(text);
    out
}

/// Web permalink for a post URI:
/// `at://did:plc:abc/app.bsky.feed.post/3kx…` →
/// `https://bsky.app/profile/{handle}/post/3kx…`.
///
/// None when the URI has no extractable record key or the handle is
/// unknown (a profile link is not constructible without one).
fn permalink(uri: &str, author: &str) -> Option<String> {
    if author == MISSING_AUTHOR {
        return None;
    }
    let rkey = match uri.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => last,
        _ => return None,
    };
    Some(format!("https://bsky.app/profile/{author}/post/{rkey}"))
}
