// tests/aggregator_pipeline.rs
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};

use crypto_news_aggregator::{
    ItemFilter, NewsAggregator, NewsCache, RawItem, SourceFeed,
};

struct StaticSource {
    name: &'static str,
    items: Vec<RawItem>,
}

#[async_trait]
impl SourceFeed for StaticSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        Ok(self.items.clone())
    }
    fn name(&self) -> &str {
        self.name
    }
}

struct FailingSource;

#[async_trait]
impl SourceFeed for FailingSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        "Failing"
    }
}

fn raw(source: &str, headline: &str, summary: &str, url: &str, age_minutes: i64) -> RawItem {
    RawItem {
        source: source.to_string(),
        headline: headline.to_string(),
        summary: summary.to_string(),
        url: url.to_string(),
        published_at: Some(Utc::now() - Duration::minutes(age_minutes)),
        categories: Vec::new(),
    }
}

fn aggregator(sources: Vec<Box<dyn SourceFeed>>) -> NewsAggregator {
    NewsAggregator::new(sources, ItemFilter::default(), Arc::new(NewsCache::new()))
        .with_jitter(None)
}

#[tokio::test]
async fn refresh_filters_dedups_sorts_and_installs() {
    let coindesk = StaticSource {
        name: "CoinDesk",
        items: vec![
            raw(
                "CoinDesk",
                "Bitcoin Surges to New All-Time High",
                "Institutional adoption pushes the price to a record.",
                "https://coindesk.test/btc-ath",
                10,
            ),
            raw(
                "CoinDesk",
                "Sponsored: Trade Like a Pro",
                "A word from our partner.",
                "https://coindesk.test/sponsored",
                5,
            ),
            // Stale: outside the 12h window.
            raw(
                "CoinDesk",
                "Old Story From Yesterday Evening",
                "This one should not survive the recency filter.",
                "https://coindesk.test/old",
                14 * 60,
            ),
        ],
    };
    let nyt = StaticSource {
        name: "NYT World",
        items: vec![
            // Near-duplicate of the CoinDesk record story.
            raw(
                "NYT World",
                "Bitcoin Surges To All Time High as Funds Pile In",
                "The cryptocurrency set a record on Friday.",
                "https://nyt.test/bitcoin-record",
                20,
            ),
            raw(
                "NYT World",
                "Trade Talks Resume After Months of Stalemate",
                "Negotiators returned to the table on Friday morning.",
                "https://nyt.test/trade-talks",
                30,
            ),
            // Exact duplicate URL of the CoinDesk item.
            raw(
                "NYT World",
                "Bitcoin Surges to New All-Time High",
                "Syndicated copy of the same article.",
                "https://coindesk.test/btc-ath",
                10,
            ),
        ],
    };

    let agg = aggregator(vec![Box::new(coindesk), Box::new(nyt)]);
    let items = agg.refresh().await;

    // Sponsored and stale are gone; the bitcoin story is clustered with a
    // second perspective kept (two sources); the URL duplicate collapsed.
    let headlines: Vec<&str> = items.iter().map(|i| i.headline.as_str()).collect();
    assert!(!headlines.iter().any(|h| h.contains("Sponsored")));
    assert!(!headlines.iter().any(|h| h.contains("Old Story")));
    assert_eq!(items.len(), 3, "got: {headlines:?}");

    let bitcoin_sources: Vec<&str> = items
        .iter()
        .filter(|i| i.headline.to_lowercase().contains("bitcoin"))
        .map(|i| i.source.as_str())
        .collect();
    assert_eq!(bitcoin_sources.len(), 2);
    assert!(bitcoin_sources.contains(&"CoinDesk"));
    assert!(bitcoin_sources.contains(&"NYT World"));

    // Sorted by published_at, strictly non-increasing.
    for pair in items.windows(2) {
        assert!(pair[0].published_at >= pair[1].published_at);
    }

    // The return value is exactly what got installed.
    let cache = agg.cache();
    assert_eq!(cache.list(), items);
    let status = cache.status();
    assert_eq!(status.item_count, 3);
    assert!(status.last_refreshed_at.is_some());
}

#[tokio::test]
async fn failing_source_is_isolated() {
    let healthy = StaticSource {
        name: "CoinDesk",
        items: vec![raw(
            "CoinDesk",
            "Stablecoin Bill Clears Committee Vote",
            "The draft moves to a floor vote.",
            "https://coindesk.test/stablecoin",
            15,
        )],
    };

    let agg = aggregator(vec![Box::new(FailingSource), Box::new(healthy)]);
    let items = agg.refresh().await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source, "CoinDesk");
}

#[tokio::test]
async fn total_failure_installs_an_empty_snapshot() {
    let cache = Arc::new(NewsCache::new());

    // First cycle with a working source populates the cache.
    let agg = NewsAggregator::new(
        vec![Box::new(StaticSource {
            name: "CoinDesk",
            items: vec![raw(
                "CoinDesk",
                "Ethereum Developers Set Upgrade Date",
                "Core developers agreed on an activation epoch.",
                "https://coindesk.test/eth-upgrade",
                5,
            )],
        })],
        ItemFilter::default(),
        cache.clone(),
    )
    .with_jitter(None);
    assert_eq!(agg.refresh().await.len(), 1);

    // A later cycle where every source fails replaces it with empty.
    let broken = NewsAggregator::new(
        vec![Box::new(FailingSource)],
        ItemFilter::default(),
        cache.clone(),
    )
    .with_jitter(None);
    let first_stamp = cache.last_refreshed_at().unwrap();
    assert!(broken.refresh().await.is_empty());
    assert!(cache.list().is_empty());
    assert!(cache.last_refreshed_at().unwrap() >= first_stamp);
}

#[tokio::test]
async fn queries_read_through_the_cache() {
    let agg = aggregator(vec![Box::new(StaticSource {
        name: "NYT World",
        items: vec![
            raw(
                "NYT World",
                "Election Observers Report Irregularities",
                "Monitors flagged delayed openings.",
                "https://nyt.test/election",
                40,
            ),
            raw(
                "NYT World",
                "Trade Talks Resume After Stalemate",
                "Negotiators returned to the table.",
                "https://nyt.test/trade",
                50,
            ),
        ],
    })]);
    let items = agg.refresh().await;
    let cache = agg.cache();

    let hit = cache.get_by_id(items[0].id).unwrap();
    assert_eq!(hit.url, items[0].url);

    let found = cache.search("trade talks");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].url, "https://nyt.test/trade");
}
