// src/metrics.rs
use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration so series show up on whatever recorder the
/// host process installs. Safe to call from every refresh.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("refresh_runs_total", "Completed refresh cycles.");
        describe_counter!("source_items_total", "Raw items parsed from source feeds.");
        describe_counter!(
            "source_errors_total",
            "Source fetch/parse errors (isolated per source)."
        );
        describe_counter!(
            "items_filtered_total",
            "Items dropped by the recency/keyword/category filter."
        );
        describe_counter!(
            "items_deduped_total",
            "Items collapsed by URL or near-duplicate clustering."
        );
        describe_histogram!(
            "source_fetch_ms",
            "Per-source fetch+parse time in milliseconds."
        );
        describe_gauge!(
            "refresh_last_run_ts",
            "Unix ts when a refresh cycle last completed."
        );
    });
}
