//! Custom error types for aptaclust operations.

use thiserror::Error;

/// Result type alias for aptaclust operations
pub type Result<T> = std::result::Result<T, AptaclustError>;

/// Error type for aptaclust operations
#[derive(Error, Debug)]
pub enum AptaclustError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "input FASTA")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Underlying I/O failure while reading or writing records
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
