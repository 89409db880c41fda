// src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uniform shape every source adapter emits, before filtering.
///
/// `published_at` is `None` when the feed's date string could not be parsed;
/// the filter treats that as "not recent" rather than failing the cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawItem {
    pub source: String,
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One canonical, filtered, deduplicated piece of content in the cache.
///
/// The `id` is assigned at ingestion and is stable only for the lifetime of
/// the snapshot it belongs to; a later refresh rebuilds the collection and
/// mints fresh ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: Uuid,
    pub source: String,
    pub headline: String,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl NewsItem {
    /// Promote a filtered raw item to a canonical item with a fresh id.
    ///
    /// Callers must have run the item through the filter first; a missing
    /// publish date is a contract violation at this point, so it falls back
    /// to the epoch rather than panicking.
    pub fn from_raw(raw: RawItem) -> Self {
        let summary = if raw.summary.is_empty() {
            raw.headline.clone()
        } else {
            raw.summary
        };
        Self {
            id: Uuid::new_v4(),
            source: raw.source,
            headline: raw.headline,
            summary,
            url: raw.url,
            published_at: raw.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
            categories: raw.categories,
        }
    }
}

/// Immutable result of one completed refresh cycle.
///
/// Items are sorted by `published_at` descending and unique by `url`.
/// The cache replaces the whole snapshot atomically; readers holding an
/// `Arc<Snapshot>` keep a self-consistent view across a swap.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub items: Vec<NewsItem>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Summary of cache state for status queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStatus {
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub item_count: usize,
}
