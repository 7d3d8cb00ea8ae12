//! Clusters ranked sequences into families of near-identical variants.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use ahash::AHashMap;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use crate::commands::command::Command;
use crate::commands::common::{IoOptions, ThreadingOptions};
use aptaclust_lib::distance::Levenshtein;
use aptaclust_lib::engine::{ClusterConfig, GreedyClusterer};
use aptaclust_lib::logging::{format_count, log_clustering_summary, OperationTimer};
use aptaclust_lib::metrics::{
    size_histogram, write_metrics_auto, ClusterMetric, ClusteringSummary,
};
use aptaclust_lib::output::ClusterWriter;
use aptaclust_lib::progress::ProgressTracker;
use aptaclust_lib::record::read_entries;
use aptaclust_lib::validation::validate_non_negative;

/// Cluster ranked sequences around their most-abundant seeds.
#[derive(Parser, Debug)]
#[command(
    name = "cluster",
    about = "Cluster ranked sequences around abundant seeds by edit distance",
    long_about = r#"
Clusters ranked, abundance-annotated sequences into families of near-identical
variants. Input is the FASTA output of an upstream count step, sorted by
descending read count, with identifiers of the form:

  >rank[(dup)]-reads-rpm

Clustering is a single greedy pass: the most-abundant unclustered sequence
becomes the seed of the next cluster, every remaining sequence within the edit
distance threshold joins that cluster, and the survivors carry over to seed
later clusters. A sequence joins the first cluster whose seed is within
threshold; it is never reconsidered against later clusters.

Each output record extends the original identifier with the cluster index, the
member's rank within the cluster, and its edit distance from the seed:

  >rank[(dup)]-reads-rpm-cluster-rank_in_cluster-distance

Sequences with reads <= --filter are excluded from clustering entirely. With
--max-clusters N, processing stops after N clusters and any remaining
sequences are dropped from the output; this bounds runtime on diverse pools.

Distance computation across the candidate pool can be parallelized with
--threads N; the output is identical to a single-threaded run.
"#
)]
pub struct ClusterSequences {
    /// Input and output FASTA files
    #[command(flatten)]
    pub io: IoOptions,

    /// Maximum edit distance for a sequence to join a cluster
    #[arg(short = 'd', long = "distance")]
    pub distance: u32,

    /// Exclude sequences with total reads <= this value from clustering
    #[arg(short = 'f', long = "filter", default_value = "0")]
    pub filter: f64,

    /// Stop after emitting this many clusters (default: unbounded)
    #[arg(short = 'c', long = "max-clusters")]
    pub max_clusters: Option<NonZeroUsize>,

    /// Suppress per-cluster progress reporting
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Optional output of per-cluster metrics
    #[arg(short = 'g', long = "cluster-metrics")]
    pub cluster_metrics: Option<PathBuf>,

    /// Optional output of cluster size counts
    #[arg(short = 's', long = "size-histogram")]
    pub size_histogram: Option<PathBuf>,

    /// Threading options for parallel processing.
    #[command(flatten)]
    pub threading: ThreadingOptions,
}

impl Command for ClusterSequences {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");

        // Validate inputs before touching any stream
        self.io.validate()?;
        validate_non_negative(self.filter, "filter")?;

        let timer = OperationTimer::new("Clustering sequences");

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Distance threshold: {}", self.distance);
        info!("Abundance filter: reads > {}", self.filter);
        match self.max_clusters {
            Some(max) => info!("Max clusters: {max}"),
            None => info!("Max clusters: unbounded"),
        }
        info!("{}", self.threading.log_message());

        // Parse the ranked input in upstream order
        let input = File::open(&self.io.input)
            .with_context(|| format!("Failed to open input: {}", self.io.input.display()))?;
        let (entries, parsed) = read_entries(BufReader::new(input), self.filter)
            .with_context(|| format!("Failed to read input: {}", self.io.input.display()))?;
        info!(
            "Read {} records: {} eligible, {} skipped, {} below filter",
            format_count(parsed.records_read),
            format_count(entries.len() as u64),
            format_count(parsed.records_skipped),
            format_count(parsed.records_filtered)
        );

        let output = File::create(&self.io.output)
            .with_context(|| format!("Failed to create output: {}", self.io.output.display()))?;
        let mut writer = ClusterWriter::new(BufWriter::new(output));

        let config = ClusterConfig { threshold: self.distance, max_clusters: self.max_clusters };
        let mut engine =
            GreedyClusterer::new(entries, config, Levenshtein, self.threading.num_threads());

        let tracker = (!self.quiet)
            .then(|| ProgressTracker::new("Clustered sequences").with_interval(10_000));

        let mut summary = ClusteringSummary {
            records_read: parsed.records_read,
            records_skipped: parsed.records_skipped,
            records_filtered: parsed.records_filtered,
            ..ClusteringSummary::default()
        };
        let mut cluster_rows: Vec<ClusterMetric> = Vec::new();
        let mut sizes: AHashMap<u64, u64> = AHashMap::new();

        while let Some(cluster) = engine.step() {
            writer
                .write_cluster(&cluster)
                .with_context(|| format!("Failed to write: {}", self.io.output.display()))?;

            summary.clusters_emitted += 1;
            summary.sequences_clustered += cluster.members.len() as u64;
            *sizes.entry(cluster.members.len() as u64).or_insert(0) += 1;
            if self.cluster_metrics.is_some() {
                cluster_rows.push(ClusterMetric::from(&cluster));
            }

            if !self.quiet {
                info!(
                    "Cluster {}: {} members, {} reads, {:.2} RPM",
                    cluster.index,
                    cluster.members.len(),
                    format_count(cluster.total_reads),
                    cluster.total_rpm
                );
            }
            if let Some(tracker) = &tracker {
                tracker.log_if_needed(cluster.members.len() as u64);
            }
        }
        if let Some(tracker) = &tracker {
            tracker.log_final();
        }

        summary.sequences_dropped_by_cap = engine.remaining() as u64;

        writer
            .finish()
            .with_context(|| format!("Failed to flush output: {}", self.io.output.display()))?;

        if let Some(path) = &self.cluster_metrics {
            write_metrics_auto(path, &cluster_rows)?;
            info!("Wrote per-cluster metrics: {}", path.display());
        }
        if let Some(path) = &self.size_histogram {
            write_metrics_auto(path, &size_histogram(&sizes))?;
            info!("Wrote cluster size histogram: {}", path.display());
        }

        log_clustering_summary(&summary);
        timer.log_completion(summary.sequences_clustered);
        Ok(())
    }
}
