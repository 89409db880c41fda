// src/aggregator.rs
//! Refresh-cycle orchestration: fan-out fetch, filter, dedup, sort, swap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, gauge};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::cache::NewsCache;
use crate::config::AggregatorConfig;
use crate::dedup;
use crate::filter::ItemFilter;
use crate::metrics::ensure_metrics_described;
use crate::model::NewsItem;
use crate::sources::rss::RssFeedSource;
use crate::sources::SourceFeed;

/// Random delay bounds between consecutive source fetches, to stay under
/// upstream rate limits.
const DEFAULT_JITTER_MS: (u64, u64) = (500, 1500);

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct NewsAggregator {
    sources: Vec<Box<dyn SourceFeed>>,
    filter: ItemFilter,
    cache: Arc<NewsCache>,
    in_flight: AtomicBool,
    jitter_ms: Option<(u64, u64)>,
}

impl NewsAggregator {
    pub fn new(sources: Vec<Box<dyn SourceFeed>>, filter: ItemFilter, cache: Arc<NewsCache>) -> Self {
        Self {
            sources,
            filter,
            cache,
            in_flight: AtomicBool::new(false),
            jitter_ms: Some(DEFAULT_JITTER_MS),
        }
    }

    /// Build an aggregator with HTTP adapters for every configured feed.
    pub fn from_config(config: &AggregatorConfig, cache: Arc<NewsCache>) -> Self {
        let sources = config
            .feeds
            .iter()
            .map(|f| Box::new(RssFeedSource::from_url(f.name.clone(), f.url.clone())) as Box<dyn SourceFeed>)
            .collect();
        Self::new(sources, config.item_filter(), cache)
    }

    /// Override or disable the inter-fetch jitter (tests pass `None`).
    pub fn with_jitter(mut self, jitter_ms: Option<(u64, u64)>) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    /// Read-side handle for query consumers.
    pub fn cache(&self) -> Arc<NewsCache> {
        self.cache.clone()
    }

    /// Run one refresh cycle and return the newly installed collection.
    ///
    /// At most one cycle runs at a time: a call that lands while another is
    /// in flight returns the current snapshot immediately instead of
    /// starting a second pipeline or blocking.
    ///
    /// Never fails. Source errors are isolated and logged; if every source
    /// fails, the empty result still replaces the snapshot — the cache
    /// always reflects the latest completed ground truth.
    pub async fn refresh(&self) -> Vec<NewsItem> {
        ensure_metrics_described();

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("refresh already in flight, returning current snapshot");
            return self.cache.list();
        }

        // Released on every exit path, including a panicking source adapter;
        // a wedged latch would turn every later refresh into a stale read.
        let _guard = InFlightGuard(&self.in_flight);
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> Vec<NewsItem> {
        let mut raw = Vec::new();
        for (idx, source) in self.sources.iter().enumerate() {
            if idx > 0 {
                if let Some((lo, hi)) = self.jitter_ms {
                    let ms = rand::rng().random_range(lo..=hi);
                    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
                }
            }
            match source.fetch_latest().await {
                Ok(mut items) => {
                    info!(source = source.name(), count = items.len(), "fetched source");
                    raw.append(&mut items);
                }
                Err(e) => {
                    warn!(error = ?e, source = source.name(), "source fetch failed");
                    counter!("source_errors_total").increment(1);
                }
            }
        }

        let now = Utc::now();
        let total = raw.len();

        let filtered: Vec<NewsItem> = raw
            .into_iter()
            .filter(|r| self.filter.accept(r, now))
            .map(NewsItem::from_raw)
            .collect();
        let dropped = total - filtered.len();
        counter!("items_filtered_total").increment(dropped as u64);

        let before_dedup = filtered.len();
        let mut items = dedup::cluster(filtered);
        counter!("items_deduped_total").increment((before_dedup - items.len()) as u64);

        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        self.cache.install(items.clone(), now);
        counter!("refresh_runs_total").increment(1);
        gauge!("refresh_last_run_ts").set(now.timestamp() as f64);

        info!(
            raw = total,
            filtered_out = dropped,
            deduped = before_dedup - items.len(),
            kept = items.len(),
            "refresh cycle complete"
        );

        items
    }
}
