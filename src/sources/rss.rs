// src/sources/rss.rs
//! Generic RSS 2.0 adapter.
//!
//! Parses `<rss><channel><item>` documents into `RawItem`s. Constructed
//! either from a fixture string (tests, demos) or from a URL fetched over
//! HTTP with a bounded timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use crate::model::RawItem;
use crate::sources::SourceFeed;

/// Upper bound on one feed fetch so a single unreachable source cannot
/// stall the whole refresh cycle.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some feeds block default HTTP-library user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    category: Vec<Category>,
}

/// `<category>` may carry a `domain` attribute (NYT feeds do); only the
/// text content matters here.
#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Parse the publish-date formats seen in the wild: RFC2822 (the RSS
/// standard) with an RFC3339 fallback. `None` on anything else; the filter
/// rejects undated items downstream.
pub fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Strip markup from a feed description: decode HTML entities, drop tags,
/// collapse whitespace.
fn clean_description(s: &str) -> String {
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());

    let decoded = html_escape::decode_html_entities(s).to_string();
    let stripped = re_tags.replace_all(&decoded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

pub struct RssFeedSource {
    name: String,
    mode: Mode,
}

impl RssFeedSource {
    /// Adapter over a canned XML document; used by tests and the demo.
    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    /// Adapter that fetches the feed over HTTP on every `fetch_latest`.
    pub fn from_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_items(&self, xml: &str) -> Result<Vec<RawItem>> {
        let t0 = std::time::Instant::now();
        let rss: Rss = from_str(xml)
            .with_context(|| format!("parsing rss xml for source {}", self.name))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            let headline = it.title.unwrap_or_default().trim().to_string();
            let summary = it
                .description
                .as_deref()
                .map(clean_description)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| headline.clone());

            out.push(RawItem {
                source: self.name.clone(),
                headline,
                summary,
                url: it.link.unwrap_or_default().trim().to_string(),
                published_at: it.pub_date.as_deref().and_then(parse_feed_date),
                categories: it
                    .category
                    .into_iter()
                    .filter_map(|c| c.value)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect(),
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("source_fetch_ms").record(ms);
        counter!("source_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceFeed for RssFeedSource {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        match &self.mode {
            Mode::Fixture(xml) => self.parse_items(xml),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .timeout(FETCH_TIMEOUT)
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .header(
                        reqwest::header::ACCEPT,
                        "application/rss+xml,application/xml;q=0.9",
                    )
                    .send()
                    .await
                    .with_context(|| format!("fetching feed {}", self.name))?;
                let body = resp
                    .text()
                    .await
                    .with_context(|| format!("reading feed body for {}", self.name))?;
                self.parse_items(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
