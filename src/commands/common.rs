//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use aptaclust_lib::validation::validate_file_exists;

/// Common input/output options for commands that read and write FASTA.
#[derive(Debug, Clone, Args)]
pub struct IoOptions {
    /// Input ranked FASTA file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output clustered FASTA file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl IoOptions {
    /// Validates that the input file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file does not exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.input, "Input FASTA")?;
        Ok(())
    }
}

/// Threading options for parallel processing.
#[derive(Debug, Clone, Default, Args)]
pub struct ThreadingOptions {
    /// Number of worker threads for the distance scan (default: 1)
    #[arg(short = '@', long = "threads")]
    pub threads: Option<usize>,
}

impl ThreadingOptions {
    /// Resolved thread count (never zero).
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or(1).max(1)
    }

    /// Human-readable description of the threading configuration.
    #[must_use]
    pub fn log_message(&self) -> String {
        match self.num_threads() {
            1 => "Threads: 1 (single-threaded distance scan)".to_string(),
            n => format!("Threads: {n} (parallel distance scan)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_threads_defaults_to_one() {
        let opts = ThreadingOptions { threads: None };
        assert_eq!(opts.num_threads(), 1);

        let opts = ThreadingOptions { threads: Some(0) };
        assert_eq!(opts.num_threads(), 1);

        let opts = ThreadingOptions { threads: Some(8) };
        assert_eq!(opts.num_threads(), 8);
    }

    #[test]
    fn test_io_options_validate_missing_input() {
        let opts = IoOptions {
            input: PathBuf::from("/definitely/not/here.fasta"),
            output: PathBuf::from("/tmp/out.fasta"),
        };
        assert!(opts.validate().is_err());
    }
}
