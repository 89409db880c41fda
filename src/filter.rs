// src/filter.rs
//! Inclusion rules applied to every raw item before deduplication.
//!
//! An item passes when it is recent, carries the required fields, and does
//! not look like sponsored/advertorial filler. Unparseable publish dates
//! fail closed: the item is rejected, the cycle continues.

use chrono::{DateTime, Duration, Utc};

use crate::model::RawItem;

/// Default recency window: only stories from the last 12 hours survive.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 12;

/// Keyword fragments that mark an item as non-news when found in the
/// headline or summary (case-insensitive).
pub const DEFAULT_EXCLUDED_KEYWORDS: &[&str] = &[
    "sponsored",
    "press release",
    "partner content",
    "advertisement",
    "promoted",
    "paid content",
    "advertorial",
    "sponsored content",
    "press-release",
    "promotion",
    "partnership",
];

/// Source-provided category tags that mark an item as non-news.
pub const DEFAULT_EXCLUDED_CATEGORIES: &[&str] = &[
    "sponsored",
    "press release",
    "press-release",
    "sponsored-content",
    "partner-content",
];

#[derive(Debug, Clone)]
pub struct ItemFilter {
    max_age: Duration,
    excluded_keywords: Vec<String>,
    excluded_categories: Vec<String>,
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_AGE_HOURS,
            DEFAULT_EXCLUDED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_EXCLUDED_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl ItemFilter {
    pub fn new(
        max_age_hours: i64,
        excluded_keywords: Vec<String>,
        excluded_categories: Vec<String>,
    ) -> Self {
        Self {
            max_age: Duration::hours(max_age_hours),
            excluded_keywords: lowercase_all(excluded_keywords),
            excluded_categories: lowercase_all(excluded_categories),
        }
    }

    /// Decide inclusion for one raw item at time `now`.
    ///
    /// Rejections are logged at debug level with the specific reason; the
    /// caller only needs the boolean.
    pub fn accept(&self, item: &RawItem, now: DateTime<Utc>) -> bool {
        if item.headline.is_empty() || item.url.is_empty() {
            tracing::debug!(source = %item.source, "rejecting item with missing headline or url");
            return false;
        }

        let Some(published_at) = item.published_at else {
            tracing::debug!(
                source = %item.source,
                headline = %item.headline,
                "rejecting item with unparseable publish date"
            );
            return false;
        };
        if now.signed_duration_since(published_at) > self.max_age {
            tracing::debug!(
                source = %item.source,
                headline = %item.headline,
                published_at = %published_at,
                "rejecting stale item"
            );
            return false;
        }

        let content = format!("{} {}", item.headline, item.summary).to_lowercase();
        for keyword in &self.excluded_keywords {
            if content.contains(keyword.as_str()) {
                tracing::debug!(
                    source = %item.source,
                    headline = %item.headline,
                    keyword = %keyword,
                    "rejecting item on excluded keyword"
                );
                return false;
            }
        }

        for category in &item.categories {
            let category_lc = category.to_lowercase();
            if self
                .excluded_categories
                .iter()
                .any(|excluded| category_lc.contains(excluded.as_str()))
            {
                tracing::debug!(
                    source = %item.source,
                    headline = %item.headline,
                    category = %category,
                    "rejecting item on excluded category"
                );
                return false;
            }
        }

        true
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}
