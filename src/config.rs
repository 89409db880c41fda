// src/config.rs
//! Feed and filter configuration. TOML or JSON, with an env-var path
//! override and sensible built-in defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::filter::{
    ItemFilter, DEFAULT_EXCLUDED_CATEGORIES, DEFAULT_EXCLUDED_KEYWORDS, DEFAULT_MAX_AGE_HOURS,
};

const ENV_PATH: &str = "NEWS_CONFIG_PATH";

/// Refresh every 15 minutes unless configured otherwise.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub feeds: Vec<FeedSpec>,
    pub refresh_interval_secs: u64,
    pub max_age_hours: i64,
    pub excluded_keywords: Vec<String>,
    pub excluded_categories: Vec<String>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                FeedSpec {
                    name: "CoinDesk".to_string(),
                    url: "https://www.coindesk.com/arc/outboundfeeds/rss/".to_string(),
                },
                FeedSpec {
                    name: "NYT World".to_string(),
                    url: "https://rss.nytimes.com/services/xml/rss/nyt/World.xml".to_string(),
                },
            ],
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            excluded_keywords: DEFAULT_EXCLUDED_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AggregatorConfig {
    /// Load from an explicit path; the extension hints the format, with a
    /// fallback attempt at the other one.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
    }

    /// Load using env var + fallbacks:
    /// 1) $NEWS_CONFIG_PATH
    /// 2) config/news.toml
    /// 3) config/news.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("NEWS_CONFIG_PATH points to non-existent path"));
        }
        let toml_p = PathBuf::from("config/news.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/news.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// The filter this configuration describes.
    pub fn item_filter(&self) -> ItemFilter {
        ItemFilter::new(
            self.max_age_hours,
            self.excluded_keywords.clone(),
            self.excluded_categories.clone(),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    fn cleaned(mut self) -> Self {
        self.excluded_keywords = clean_list(self.excluded_keywords);
        self.excluded_categories = clean_list(self.excluded_categories);
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AggregatorConfig> {
    if hint_ext == "json" {
        if let Ok(v) = parse_json(s) {
            return Ok(v);
        }
        return parse_toml(s);
    }
    if let Ok(v) = parse_toml(s) {
        return Ok(v);
    }
    parse_json(s).map_err(|_| anyhow!("unsupported config format"))
}

fn parse_toml(s: &str) -> Result<AggregatorConfig> {
    let v: AggregatorConfig = toml::from_str(s)?;
    Ok(v.cleaned())
}

fn parse_json(s: &str) -> Result<AggregatorConfig> {
    let v: AggregatorConfig = serde_json::from_str(s)?;
    Ok(v.cleaned())
}

/// Trim entries, drop empties, deduplicate.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim();
        if !t.is_empty() {
            set.insert(t.to_string());
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_both_parse() {
        let toml = r#"
refresh_interval_secs = 300
max_age_hours = 6

[[feeds]]
name = "CoinDesk"
url = "https://example.test/rss"
"#;
        let cfg = parse_toml(toml).unwrap();
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.max_age_hours, 6);
        assert_eq!(cfg.feeds.len(), 1);
        // Unspecified lists keep the defaults.
        assert!(!cfg.excluded_keywords.is_empty());

        let json = r#"{"feeds":[{"name":"NYT","url":"https://example.test/nyt"}]}"#;
        let cfg = parse_json(json).unwrap();
        assert_eq!(cfg.feeds[0].name, "NYT");
        assert_eq!(cfg.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
    }

    #[test]
    fn lists_are_trimmed_and_deduplicated() {
        let toml = r#"excluded_keywords = [" sponsored ", "", "promoted", "promoted"]"#;
        let cfg = parse_toml(toml).unwrap();
        assert_eq!(
            cfg.excluded_keywords,
            vec!["promoted".to_string(), "sponsored".to_string()]
        );
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so a real config/ in the repo does not interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD -> built-in defaults.
        let cfg = AggregatorConfig::load_default().unwrap();
        assert_eq!(cfg.feeds.len(), 2);
        assert_eq!(cfg.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);

        // Env var takes precedence.
        let p_json = tmp.path().join("news.json");
        fs::write(
            &p_json,
            r#"{"feeds":[{"name":"X","url":"https://example.test/x"}]}"#,
        )
        .unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let cfg = AggregatorConfig::load_default().unwrap();
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.feeds[0].name, "X");
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
