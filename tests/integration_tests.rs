//! Integration tests for aptaclust.
//!
//! Run with: `cargo test --test integration_tests`
//!
//! These tests validate end-to-end workflows spanning multiple modules:
//! parsing ranked FASTA, greedy clustering, and clustered-FASTA output.

use std::num::NonZeroUsize;

use aptaclust_lib::distance::{levenshtein, Levenshtein};
use aptaclust_lib::engine::{Cluster, ClusterConfig, GreedyClusterer};
use aptaclust_lib::output::ClusterWriter;
use aptaclust_lib::record::read_entries;
use rstest::rstest;

/// The standard pool from the clustering scenarios:
/// A (10 reads, AAAA), B (8 reads, AAAT), C (5 reads, TTTT).
const ABC_POOL: &[u8] = b">1-10-1000.0\nAAAA\n>2-8-800.0\nAAAT\n>3-5-500.0\nTTTT\n";

fn cluster_pool(
    input: &[u8],
    filter: f64,
    threshold: u32,
    max_clusters: Option<usize>,
) -> (Vec<Cluster>, usize) {
    let (entries, _) = read_entries(input, filter).unwrap();
    let config = ClusterConfig {
        threshold,
        max_clusters: max_clusters.and_then(NonZeroUsize::new),
    };
    let mut engine = GreedyClusterer::new(entries, config, Levenshtein, 1);
    let mut clusters = Vec::new();
    while let Some(cluster) = engine.step() {
        clusters.push(cluster);
    }
    (clusters, engine.remaining())
}

#[test]
fn test_threshold_one_scenario() {
    // Expect one cluster {A seed, B at distance 1} and cluster 2 {C seed only}.
    let (clusters, remaining) = cluster_pool(ABC_POOL, 0.0, 1, None);

    assert_eq!(clusters.len(), 2);
    assert_eq!(remaining, 0);

    let first = &clusters[0];
    assert_eq!(first.index, 1);
    assert_eq!(first.members.len(), 2);
    assert_eq!(first.members[0].entry.id, "1-10-1000.0");
    assert_eq!(first.members[0].distance, 0);
    assert_eq!(first.members[1].entry.id, "2-8-800.0");
    assert_eq!(first.members[1].distance, 1);
    assert_eq!(first.total_reads, 18);

    let second = &clusters[1];
    assert_eq!(second.index, 2);
    assert_eq!(second.members.len(), 1);
    assert_eq!(second.members[0].entry.id, "3-5-500.0");
}

#[test]
fn test_threshold_zero_scenario() {
    // Three singleton clusters, in original order.
    let (clusters, remaining) = cluster_pool(ABC_POOL, 0.0, 0, None);

    assert_eq!(clusters.len(), 3);
    assert_eq!(remaining, 0);
    let ids: Vec<&str> = clusters.iter().map(|c| c.seed().entry.id.as_str()).collect();
    assert_eq!(ids, vec!["1-10-1000.0", "2-8-800.0", "3-5-500.0"]);
    assert!(clusters.iter().all(|c| c.members.len() == 1));
}

#[test]
fn test_max_clusters_scenario() {
    // max_clusters=1 with threshold=0: exactly one cluster (A); B and C dropped.
    let (clusters, remaining) = cluster_pool(ABC_POOL, 0.0, 0, Some(1));

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].seed().entry.id, "1-10-1000.0");
    assert_eq!(remaining, 2);
}

#[test]
fn test_abundance_filter_scenario() {
    // filter=8: only A and B are eligible; C never enters clustering.
    let (clusters, remaining) = cluster_pool(ABC_POOL, 8.0, 1, None);

    assert_eq!(remaining, 0);
    let ids: Vec<&str> = clusters
        .iter()
        .flat_map(|c| c.members.iter().map(|m| m.entry.id.as_str()))
        .collect();
    assert_eq!(ids, vec!["1-10-1000.0"]);
    // B has 8 reads == filter, so the strict comparison excludes it too.
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
fn test_every_filtered_entry_lands_in_exactly_one_cluster(#[case] threshold: u32) {
    let input: &[u8] = b">1-50-5000.0\nACGTACGT\n>2-40-4000.0\nACGTACGA\n\
        >3-30-3000.0\nTTTTACGT\n>4-20-2000.0\nACGTACTA\n>5-10-1000.0\nGGGGGGGG\n";
    let (clusters, remaining) = cluster_pool(input, 0.0, threshold, None);

    assert_eq!(remaining, 0);
    let mut ids: Vec<String> = clusters
        .iter()
        .flat_map(|c| c.members.iter().map(|m| m.entry.id.clone()))
        .collect();
    ids.sort();
    assert_eq!(ids.len(), 5);
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_members_within_threshold_of_seed() {
    let input: &[u8] = b">1-50-5000.0\nACGTACGT\n>2-40-4000.0\nACGTACGA\n\
        >3-30-3000.0\nTTTTACGT\n>4-20-2000.0\nACGTACTA\n>5-10-1000.0\nGGGGGGGG\n";
    let threshold = 2;
    let (clusters, _) = cluster_pool(input, 0.0, threshold, None);

    for cluster in &clusters {
        let seed_seq = &cluster.seed().entry.seq;
        for member in &cluster.members {
            let recomputed = levenshtein(seed_seq, &member.entry.seq);
            assert_eq!(recomputed, member.distance);
            assert!(member.distance <= threshold);
        }
    }

    // Seeds of later clusters were rejected by every earlier seed.
    for (i, later) in clusters.iter().enumerate().skip(1) {
        for earlier in &clusters[..i] {
            let d = levenshtein(&earlier.seed().entry.seq, &later.seed().entry.seq);
            assert!(d > threshold);
        }
    }
}

#[test]
fn test_full_pipeline_to_fasta() {
    let (entries, summary) = read_entries(ABC_POOL, 0.0).unwrap();
    assert_eq!(summary.records_read, 3);

    let config = ClusterConfig { threshold: 1, max_clusters: None };
    let mut engine = GreedyClusterer::new(entries, config, Levenshtein, 1);
    let mut writer = ClusterWriter::new(Vec::new());
    while let Some(cluster) = engine.step() {
        writer.write_cluster(&cluster).unwrap();
    }
    let out = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert_eq!(
        out,
        ">1-10-1000.0-1-1-0\nAAAA\n>2-8-800.0-1-2-1\nAAAT\n>3-5-500.0-2-1-0\nTTTT\n"
    );
}

#[test]
fn test_clustered_output_parses_as_nothing_upstream() {
    // Clustered identifiers have six fields and must NOT re-parse as ranked
    // input records, so feeding a clustered file back in yields no entries.
    let clustered: &[u8] = b">1-10-1000.0-1-1-0\nAAAA\n>2-8-800.0-1-2-1\nAAAT\n";
    let (entries, summary) = read_entries(clustered, 0.0).unwrap();
    assert!(entries.is_empty());
    assert_eq!(summary.records_skipped, 2);
}

#[test]
fn test_malformed_records_do_not_poison_clustering() {
    let input: &[u8] = b">1-10-1000.0\nAAAA\n>garbage header\nACGT\n>2-8-800.0\nAAAT\n";
    let (clusters, remaining) = cluster_pool(input, 0.0, 1, None);

    assert_eq!(remaining, 0);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members.len(), 2);
}

#[test]
fn test_duplicate_rank_identifiers_flow_through() {
    let input: &[u8] = b">3(1)-20-2000.0\nACGT\n>3(2)-20-2000.0\nTGCA\n";
    let (clusters, _) = cluster_pool(input, 0.0, 0, None);

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].seed().entry.id, "3(1)-20-2000.0");
    assert_eq!(clusters[1].seed().entry.id, "3(2)-20-2000.0");
}

#[test]
fn test_parallel_run_is_deterministic() {
    let input: &[u8] = b">1-50-5000.0\nACGTACGT\n>2-40-4000.0\nACGTACGA\n\
        >3-30-3000.0\nTTTTACGT\n>4-20-2000.0\nACGTACTA\n>5-10-1000.0\nGGGGGGGG\n";

    let (entries, _) = read_entries(input, 0.0).unwrap();
    let config = ClusterConfig { threshold: 2, max_clusters: None };

    let sequential: Vec<Cluster> =
        GreedyClusterer::new(entries.clone(), config, Levenshtein, 1).collect();
    let parallel: Vec<Cluster> = GreedyClusterer::new(entries, config, Levenshtein, 4).collect();

    assert_eq!(sequential, parallel);
}
