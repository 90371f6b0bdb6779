// src/bsky/mod.rs
pub mod feed;
pub mod session;
pub mod types;

/// Service base used by both live clients.
pub const DEFAULT_SERVICE_BASE: &str = "https://bsky.social";
