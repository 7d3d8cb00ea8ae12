//! Enhanced logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly logging utilities for
//! counts, rates, and operation summaries.

use std::time::{Duration, Instant};

use crate::metrics::ClusteringSummary;

/// Formats a count with thousands separators (e.g., "1,234,567").
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();

    bytes
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a percentage with specified decimal places.
///
/// # Arguments
///
/// * `value` - The fraction (0.0-1.0) to format as percentage
/// * `decimals` - Number of decimal places to include
///
/// # Examples
///
/// ```
/// use aptaclust_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form (e.g., "2m 15s", "1h 30m").
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (items per second) with appropriate units.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a formatted summary of a clustering run.
///
/// Outputs record counts, cluster counts, and what (if anything) the
/// cluster cap left unemitted.
#[allow(clippy::cast_precision_loss)]
pub fn log_clustering_summary(summary: &ClusteringSummary) {
    log::info!("Clustering Summary:");
    log::info!("  Records read: {}", format_count(summary.records_read));
    log::info!("  Records skipped (malformed): {}", format_count(summary.records_skipped));
    log::info!("  Records below filter: {}", format_count(summary.records_filtered));
    log::info!("  Records clustered: {}", format_count(summary.sequences_clustered));

    if summary.records_read > 0 {
        let kept = summary.sequences_clustered as f64 / summary.records_read as f64;
        log::info!("  Clustered fraction: {}", format_percent(kept, 2));
    }

    log::info!("  Clusters emitted: {}", format_count(summary.clusters_emitted));

    if summary.clusters_emitted > 0 {
        log::info!(
            "  Avg members/cluster: {:.1}",
            summary.sequences_clustered as f64 / summary.clusters_emitted as f64
        );
    }

    // Only mention dropped sequences when the cap actually truncated the run
    if summary.sequences_dropped_by_cap > 0 {
        log::info!(
            "  Sequences dropped by cluster cap: {}",
            format_count(summary.sequences_dropped_by_cap)
        );
    }
}

/// Operation timing and summary helper.
///
/// Tracks operation timing and provides formatted summary output.
///
/// # Examples
///
/// ```no_run
/// use aptaclust_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Clustering sequences");
///
/// // ... do work ...
///
/// timer.log_completion(10_000); // Log with item count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.9543, 2), "95.43%");
        assert_eq!(format_percent(0.5, 1), "50.0%");
        assert_eq!(format_percent(1.0, 0), "100%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
        assert_eq!(format_rate(60, Duration::from_secs(60)), "1 items/s");
        assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 items/min");
        // Near-zero duration
        assert!(format_rate(1000, Duration::from_nanos(1)).contains("items/s"));
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("Test");
        timer.log_completion(1000);
    }

    #[test]
    fn test_log_clustering_summary() {
        // Empty summary
        log_clustering_summary(&ClusteringSummary::default());

        // With data and a truncating cap
        let summary = ClusteringSummary {
            records_read: 10_000,
            records_skipped: 12,
            records_filtered: 1_500,
            sequences_clustered: 8_000,
            clusters_emitted: 45,
            sequences_dropped_by_cap: 488,
        };
        log_clustering_summary(&summary);
    }
}
