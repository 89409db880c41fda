// src/lib.rs
// Public library surface for integration tests (and host services).

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod dedup;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod scheduler;
pub mod sources;

// ---- Re-exports for a stable public API ----
pub use crate::aggregator::NewsAggregator;
pub use crate::cache::NewsCache;
pub use crate::config::{AggregatorConfig, FeedSpec};
pub use crate::filter::ItemFilter;
pub use crate::model::{CacheStatus, NewsItem, RawItem, Snapshot};
pub use crate::scheduler::Scheduler;
pub use crate::sources::{rss::RssFeedSource, SourceFeed};
