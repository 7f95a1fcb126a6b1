//! skyfeed CLI - Command line tools for the SBS-1 feed.
//!
//! This crate provides the feed-side binaries:
//! - watch_feed: single-client feed watcher
//! - multi_watch: many concurrent clients with per-client tallies

pub mod feed;

pub use feed::FeedReader;
