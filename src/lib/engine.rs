//! Greedy seed clustering engine.
//!
//! The engine is a sequential state machine over one piece of state: the
//! remaining pool of unclustered entries. Each step pops the pool head (the
//! most-abundant unclustered entry, since the pool preserves the upstream
//! descending-reads order) as a cluster seed, measures the edit distance from
//! the seed to every remaining candidate, consumes candidates within the
//! threshold into the cluster, and replaces the pool with the survivors. The
//! engine is done when the pool is empty or the configured cluster cap has
//! been reached.
//!
//! A sequence joins the FIRST cluster whose seed is within threshold and is
//! never reconsidered against later clusters; within-cluster rank reflects
//! evaluation order (abundance order), so no explicit tie-breaking is
//! needed. The inner scan may run on a rayon pool: distances are computed
//! with an indexed parallel map and merged sequentially, so member order and
//! survivor order are identical to the single-threaded path.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::distance::DistanceMetric;
use crate::record::Entry;

/// Engine configuration, fixed before the first step.
#[derive(Debug, Clone, Copy)]
pub struct ClusterConfig {
    /// Maximum edit distance for a candidate to join a cluster.
    pub threshold: u32,
    /// Stop after this many clusters; `None` means unbounded.
    pub max_clusters: Option<NonZeroUsize>,
}

/// One member of a finished cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMember {
    /// The underlying ranked entry.
    pub entry: Entry,
    /// 1-based position within the cluster, assigned in evaluation order.
    pub rank_in_cluster: usize,
    /// Edit distance from the cluster seed (0 for the seed itself).
    pub distance: u32,
}

/// Result of one engine step: a seed and every entry it captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// 1-based sequential index, assigned in emission order.
    pub index: usize,
    /// Members in evaluation order; the first member is always the seed.
    pub members: Vec<ClusterMember>,
    /// Sum of member read counts.
    pub total_reads: u64,
    /// Sum of member RPM values.
    pub total_rpm: f64,
}

impl Cluster {
    /// The seed member (always present, always first).
    #[must_use]
    pub fn seed(&self) -> &ClusterMember {
        &self.members[0]
    }

    /// Number of members, seed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// A cluster always holds at least its seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The greedy clustering state machine.
///
/// Owns the remaining pool exclusively; the pool is replaced wholesale with
/// the kept partition on every step and no cluster history is retained.
///
/// # Example
///
/// ```
/// use aptaclust_lib::distance::Levenshtein;
/// use aptaclust_lib::engine::{ClusterConfig, GreedyClusterer};
/// use aptaclust_lib::record::Entry;
///
/// let entries = vec![
///     Entry { id: "1-10-1000.0".into(), reads: 10, rpm: 1000.0, seq: b"AAAA".to_vec() },
///     Entry { id: "2-8-800.0".into(), reads: 8, rpm: 800.0, seq: b"AAAT".to_vec() },
/// ];
/// let config = ClusterConfig { threshold: 1, max_clusters: None };
/// let mut engine = GreedyClusterer::new(entries, config, Levenshtein, 1);
///
/// let cluster = engine.step().unwrap();
/// assert_eq!(cluster.members.len(), 2);
/// assert!(engine.step().is_none());
/// ```
pub struct GreedyClusterer<D> {
    pool: Vec<Entry>,
    emitted: usize,
    config: ClusterConfig,
    metric: D,
    thread_pool: Option<ThreadPool>,
}

impl<D: DistanceMetric> GreedyClusterer<D> {
    /// Create an engine over an already-filtered, abundance-ordered entry
    /// list.
    ///
    /// `threads > 1` builds a dedicated rayon pool for the inner distance
    /// scan; the clustering result is identical either way.
    ///
    /// # Panics
    ///
    /// Panics if the thread pool cannot be created.
    #[must_use]
    pub fn new(entries: Vec<Entry>, config: ClusterConfig, metric: D, threads: usize) -> Self {
        let thread_pool = if threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .expect("Failed to create thread pool"),
            )
        } else {
            None
        };
        Self { pool: entries, emitted: 0, config, metric, thread_pool }
    }

    /// True once the pool is exhausted or the cluster cap has been reached.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pool.is_empty()
            || self.config.max_clusters.is_some_and(|max| self.emitted >= max.get())
    }

    /// Number of entries still waiting to be clustered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Number of clusters emitted so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Perform one step: emit the next cluster, or `None` when done.
    ///
    /// When the cap stops iteration early the surviving pool stays inside
    /// the engine unemitted; callers can observe it via [`remaining`].
    ///
    /// [`remaining`]: GreedyClusterer::remaining
    pub fn step(&mut self) -> Option<Cluster> {
        if self.is_done() {
            return None;
        }

        let mut pool = std::mem::take(&mut self.pool);
        let candidates = pool.split_off(1);
        let seed = pool.pop()?;

        let distances = Self::scan(self, &seed, &candidates);

        let mut members = Vec::with_capacity(1 + candidates.len() / 4);
        let mut total_reads = seed.reads;
        let mut total_rpm = seed.rpm;
        members.push(ClusterMember { entry: seed, rank_in_cluster: 1, distance: 0 });

        let mut kept = Vec::with_capacity(candidates.len());
        for (candidate, distance) in candidates.into_iter().zip(distances) {
            if distance <= self.config.threshold {
                total_reads += candidate.reads;
                total_rpm += candidate.rpm;
                let rank_in_cluster = members.len() + 1;
                members.push(ClusterMember { entry: candidate, rank_in_cluster, distance });
            } else {
                kept.push(candidate);
            }
        }

        self.pool = kept;
        self.emitted += 1;
        Some(Cluster { index: self.emitted, members, total_reads, total_rpm })
    }

    /// Distance from the seed to each candidate, in candidate order.
    fn scan(&self, seed: &Entry, candidates: &[Entry]) -> Vec<u32> {
        match &self.thread_pool {
            Some(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .map(|candidate| self.metric.distance(&seed.seq, &candidate.seq))
                    .collect()
            }),
            None => candidates
                .iter()
                .map(|candidate| self.metric.distance(&seed.seq, &candidate.seq))
                .collect(),
        }
    }
}

impl<D: DistanceMetric> Iterator for GreedyClusterer<D> {
    type Item = Cluster;

    fn next(&mut self) -> Option<Cluster> {
        self.step()
    }
}
