//! Input validation utilities
//!
//! Common validation functions for command-line parameters and file paths
//! with consistent error messages.

use crate::errors::{AptaclustError, Result};
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input FASTA")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use aptaclust_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/pool.fasta", "Input FASTA");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(AptaclustError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that a non-negative decimal parameter is finite and `>= 0`.
///
/// # Errors
/// Returns an error if the value is negative, NaN, or infinite
pub fn validate_non_negative(value: f64, name: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AptaclustError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be a non-negative number, got: {value}"),
        });
    }
    Ok(())
}
