// src/dedup.rs
//! Near-duplicate story clustering.
//!
//! Headlines are normalized to lowercase word soup, compared pairwise with
//! Jaccard similarity, and greedily grouped into clusters. Each cluster keeps
//! its most complete member, plus one member from a second source when the
//! story is genuinely multi-sourced.

use std::collections::HashSet;

use crate::model::NewsItem;

/// Minimum word overlap before two headlines count as the same story.
/// Strictly-greater comparison, so 0.4 itself founds a new cluster.
const SIMILARITY_THRESHOLD: f64 = 0.4;

/// Normalize a headline for comparison: lowercase, every non-alphanumeric
/// run becomes a single space, leading/trailing whitespace trimmed.
pub fn normalize_headline(s: &str) -> String {
    let mut mapped = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            for lc in ch.to_lowercase() {
                mapped.push(lc);
            }
        } else {
            mapped.push(' ');
        }
    }
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Jaccard similarity of two strings' word sets, in [0, 1].
///
/// Pure function of its inputs. An empty union (both strings blank) is
/// defined as 0.0 rather than dividing by zero.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

struct Cluster {
    /// Normalized headline of the founding member; the comparison key for
    /// every later assignment.
    key: String,
    members: Vec<NewsItem>,
}

/// Collapse near-duplicate items to a representative set.
///
/// Items sharing an identical URL are literal duplicates and reduced to the
/// first seen before any similarity work. Output order is not significant;
/// the aggregator re-sorts afterward.
pub fn cluster(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if seen_urls.insert(item.url.clone()) {
            unique.push(item);
        } else {
            tracing::debug!(url = %item.url, "duplicate url, keeping first seen");
        }
    }

    // Greedy single pass: assign each item to the most similar existing
    // cluster above the threshold, first cluster winning ties.
    let mut clusters: Vec<Cluster> = Vec::new();
    for item in unique {
        let normalized = normalize_headline(&item.headline);

        let mut best: Option<(usize, f64)> = None;
        for (idx, c) in clusters.iter().enumerate() {
            let sim = jaccard(&normalized, &c.key);
            if sim > SIMILARITY_THRESHOLD && best.is_none_or(|(_, b)| sim > b) {
                best = Some((idx, sim));
            }
        }

        match best {
            Some((idx, _)) => clusters[idx].members.push(item),
            None => clusters.push(Cluster {
                key: normalized,
                members: vec![item],
            }),
        }
    }

    let mut representatives = Vec::with_capacity(clusters.len());
    for mut c in clusters {
        c.members.sort_by(|a, b| {
            completeness(b)
                .cmp(&completeness(a))
                .then_with(|| b.published_at.cmp(&a.published_at))
        });

        let top = c.members[0].clone();
        let top_source = top.source.clone();
        representatives.push(top);

        // Preserve a second perspective when another source reported the
        // same story.
        if c.members.len() > 1 {
            if let Some(alt) = c.members.iter().skip(1).find(|m| m.source != top_source) {
                representatives.push(alt.clone());
            }
        }
    }

    representatives
}

/// Completeness score: 2 points for a real headline, 1 for a real summary.
fn completeness(item: &NewsItem) -> u8 {
    let mut score = 0;
    if item.headline.chars().count() > 10 {
        score += 2;
    }
    if item.summary.chars().count() > 20 {
        score += 1;
    }
    score
}
