//! Clustered-record output formatting.
//!
//! Each cluster member is written as one FASTA record in member order. The
//! header extends the member's original ranked identifier with the cluster
//! index, the member's rank within the cluster, and its edit distance from
//! the seed:
//!
//! ```text
//! >rank[(dup)]-reads-rpm-cluster-rank_in_cluster-distance
//! SEQUENCE
//! ```
//!
//! Emission is streaming: a cluster is written as soon as it is finalized,
//! with no buffering of prior clusters beyond the underlying writer.

use std::io::{self, Write};

use crate::engine::Cluster;

/// Streaming FASTA writer for finished clusters.
pub struct ClusterWriter<W: Write> {
    inner: W,
}

impl<W: Write> ClusterWriter<W> {
    /// Wrap a destination writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write every member of `cluster`, in member order.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_cluster(&mut self, cluster: &Cluster) -> io::Result<()> {
        for member in &cluster.members {
            writeln!(
                self.inner,
                ">{}-{}-{}-{}",
                member.entry.id, cluster.index, member.rank_in_cluster, member.distance
            )?;
            self.inner.write_all(&member.entry.seq)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any error from flushing the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
