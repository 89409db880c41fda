// src/sources/mod.rs
pub mod rss;

use anyhow::Result;

use crate::model::RawItem;

/// The per-feed fetch/parse boundary. One instance per configured source;
/// each adapter normalizes its feed format into `RawItem`s.
#[async_trait::async_trait]
pub trait SourceFeed: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> &str;
}
