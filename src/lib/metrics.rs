//! Structured metric types and TSV writer for clustering runs.
//!
//! Metric structs are serialized to TSV through `fgoxide`'s [`DelimFile`],
//! one row per record, matching the layout downstream notebooks expect.

use ahash::AHashMap;
use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::Cluster;

/// Number of decimal places used for float metrics.
pub const FLOAT_PRECISION: usize = 6;

/// Formats a float value with the standard precision for metrics.
///
/// # Example
/// ```
/// use aptaclust_lib::metrics::format_float;
/// assert_eq!(format_float(0.9), "0.900000");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:.FLOAT_PRECISION$}")
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

/// Write metrics to a TSV file with consistent error handling.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics<P: AsRef<Path>, T: Serialize>(
    path: P,
    metrics: &[T],
    description: &str,
) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default()
        .write_tsv(&path, metrics)
        .with_context(|| format!("Failed to write {} metrics: {}", description, path_ref.display()))
}

/// Write metrics implementing the [`Metric`] trait to a TSV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics_auto<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    write_metrics(path, metrics, T::metric_name())
}

/// One row per emitted cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterMetric {
    /// 1-based cluster index in emission order.
    pub cluster_index: usize,
    /// Number of members, seed included.
    pub members: u64,
    /// Sum of member read counts.
    pub total_reads: u64,
    /// Sum of member RPM values.
    pub total_rpm: f64,
    /// Ranked identifier of the cluster seed.
    pub seed_id: String,
    /// Length of the seed sequence.
    pub seed_length: usize,
}

impl Metric for ClusterMetric {
    fn metric_name() -> &'static str {
        "per-cluster"
    }
}

impl From<&Cluster> for ClusterMetric {
    fn from(cluster: &Cluster) -> Self {
        let seed = cluster.seed();
        Self {
            cluster_index: cluster.index,
            members: cluster.members.len() as u64,
            total_reads: cluster.total_reads,
            total_rpm: cluster.total_rpm,
            seed_id: seed.entry.id.clone(),
            seed_length: seed.entry.seq.len(),
        }
    }
}

/// Cluster size distribution: how many clusters have a given member count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClusterSizeMetric {
    /// The cluster size (number of members per cluster).
    pub members: u64,
    /// The number of clusters with this size.
    pub count: u64,
    /// The fraction of all clusters with this size.
    pub fraction: f64,
    /// The fraction of clusters with size >= this size.
    pub fraction_gt_or_eq_members: f64,
}

impl Metric for ClusterSizeMetric {
    fn metric_name() -> &'static str {
        "cluster size"
    }
}

/// Build the sorted size-distribution rows from a size -> count accumulator.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_histogram(sizes: &AHashMap<u64, u64>) -> Vec<ClusterSizeMetric> {
    let total: u64 = sizes.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut rows: Vec<(u64, u64)> = sizes.iter().map(|(&size, &count)| (size, count)).collect();
    rows.sort_unstable_by_key(|&(size, _)| size);

    // Walk from the largest size down so the cumulative fraction is a single pass.
    let mut cumulative = 0u64;
    let mut metrics: Vec<ClusterSizeMetric> = rows
        .into_iter()
        .rev()
        .map(|(members, count)| {
            cumulative += count;
            ClusterSizeMetric {
                members,
                count,
                fraction: count as f64 / total as f64,
                fraction_gt_or_eq_members: cumulative as f64 / total as f64,
            }
        })
        .collect();
    metrics.reverse();
    metrics
}

/// Aggregate counters for one clustering run, logged at completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusteringSummary {
    /// FASTA records seen in the input.
    pub records_read: u64,
    /// Records dropped for not matching the ranked-record grammar.
    pub records_skipped: u64,
    /// Well-formed records dropped by the abundance filter.
    pub records_filtered: u64,
    /// Entries assigned to an emitted cluster.
    pub sequences_clustered: u64,
    /// Clusters emitted.
    pub clusters_emitted: u64,
    /// Entries left unemitted because the cluster cap stopped iteration.
    pub sequences_dropped_by_cap: u64,
}
