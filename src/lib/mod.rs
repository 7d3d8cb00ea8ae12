#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! # aptaclust - greedy clustering of ranked selection-pool sequences
//!
//! This library clusters ranked, abundance-annotated sequences (the output
//! of an upstream count/dedup step) into groups of near-identical sequences
//! around their most-abundant seeds, using an exact edit-distance threshold.
//! It is used on high-throughput selection pools (aptamer/SELEX) to collapse
//! sequencing noise and point mutations.
//!
//! ## Overview
//!
//! - **[`record`]** - ranked-FASTA record parsing and the abundance filter
//! - **[`distance`]** - the [`DistanceMetric`](distance::DistanceMetric)
//!   seam and the Levenshtein reference implementation
//! - **[`engine`]** - the greedy seed-clustering state machine
//! - **[`output`]** - streaming clustered-FASTA emission
//! - **[`metrics`]** - per-cluster and size-distribution metrics with TSV output
//! - **[`progress`]** / **[`logging`]** - interval progress and summary logging
//! - **[`errors`]** / **[`validation`]** - error types and input validation
//!
//! ## Quick start
//!
//! ```
//! use aptaclust_lib::distance::Levenshtein;
//! use aptaclust_lib::engine::{ClusterConfig, GreedyClusterer};
//! use aptaclust_lib::record::read_entries;
//!
//! let input: &[u8] = b">1-10-1000.0\nAAAA\n>2-8-800.0\nAAAT\n>3-5-500.0\nTTTT\n";
//! let (entries, _summary) = read_entries(input, 0.0)?;
//!
//! let config = ClusterConfig { threshold: 1, max_clusters: None };
//! let engine = GreedyClusterer::new(entries, config, Levenshtein, 1);
//!
//! let clusters: Vec<_> = engine.collect();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].members.len(), 2);
//! # Ok::<(), aptaclust_lib::AptaclustError>(())
//! ```

pub mod distance;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod progress;
pub mod record;
pub mod validation;

pub use engine::{Cluster, ClusterConfig, ClusterMember, GreedyClusterer};
pub use errors::{AptaclustError, Result};
pub use record::Entry;
