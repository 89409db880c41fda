//! Demo that runs one refresh cycle against bundled RSS fixtures and prints
//! the resulting collection.

use std::sync::Arc;

use crypto_news_aggregator::filter::{DEFAULT_EXCLUDED_CATEGORIES, DEFAULT_EXCLUDED_KEYWORDS};
use crypto_news_aggregator::{ItemFilter, NewsAggregator, NewsCache, RssFeedSource, SourceFeed};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let coindesk_xml: &str = include_str!("../../tests/fixtures/coindesk_rss.xml");
    let nyt_xml: &str = include_str!("../../tests/fixtures/nyt_world_rss.xml");

    let sources: Vec<Box<dyn SourceFeed>> = vec![
        Box::new(RssFeedSource::from_fixture("CoinDesk", coindesk_xml)),
        Box::new(RssFeedSource::from_fixture("NYT World", nyt_xml)),
    ];

    // The fixtures carry static dates, so widen the recency window far
    // enough that they all qualify; the sponsored-content lists still apply.
    let filter = ItemFilter::new(
        24 * 365 * 20,
        DEFAULT_EXCLUDED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        DEFAULT_EXCLUDED_CATEGORIES.iter().map(|s| s.to_string()).collect(),
    );

    let cache = Arc::new(NewsCache::new());
    let aggregator = NewsAggregator::new(sources, filter, cache.clone()).with_jitter(None);

    let items = aggregator.refresh().await;
    for item in &items {
        println!("{}  [{}]  {}", item.published_at, item.source, item.headline);
    }

    let status = cache.status();
    println!(
        "refresh-demo done: {} items, last refreshed {:?}",
        status.item_count, status.last_refreshed_at
    );
}
