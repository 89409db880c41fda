// src/cache.rs
//! In-memory snapshot cache for the aggregated collection.
//!
//! The only mutable shared state is the snapshot pointer. The aggregator
//! replaces it wholesale after a completed refresh; readers clone the `Arc`
//! under a short read lock and keep a self-consistent view for the duration
//! of their read, never a partially built collection.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{CacheStatus, NewsItem, Snapshot};

#[derive(Debug, Default)]
pub struct NewsCache {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl NewsCache {
    /// Empty cache: no items, no refresh timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().expect("cache rwlock poisoned").clone()
    }

    /// Items of the current snapshot, most recent first. Never blocks on a
    /// refresh in progress.
    pub fn list(&self) -> Vec<NewsItem> {
        self.current().items.clone()
    }

    /// Point lookup by the id assigned during the snapshot's refresh.
    pub fn get_by_id(&self, id: Uuid) -> Option<NewsItem> {
        self.current().items.iter().find(|i| i.id == id).cloned()
    }

    /// Case-insensitive substring search over headline and summary, in
    /// snapshot order.
    pub fn search(&self, query: &str) -> Vec<NewsItem> {
        let needle = query.to_lowercase();
        self.current()
            .items
            .iter()
            .filter(|i| {
                i.headline.to_lowercase().contains(&needle)
                    || i.summary.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Timestamp of the last completed refresh; `None` before the first.
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.current().last_refreshed_at
    }

    pub fn status(&self) -> CacheStatus {
        let snap = self.current();
        CacheStatus {
            last_refreshed_at: snap.last_refreshed_at,
            item_count: snap.items.len(),
        }
    }

    /// Atomically install a freshly built collection. Called once per
    /// completed refresh cycle; `items` must already be filtered,
    /// deduplicated, and sorted by `published_at` descending.
    pub(crate) fn install(&self, items: Vec<NewsItem>, refreshed_at: DateTime<Utc>) {
        let next = Arc::new(Snapshot {
            items,
            last_refreshed_at: Some(refreshed_at),
        });
        *self.snapshot.write().expect("cache rwlock poisoned") = next;
    }
}
