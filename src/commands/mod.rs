#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines
)]

//! CLI command implementations for aptaclust.
//!
//! Each submodule implements a specific command:
//!
//! - [`cluster`] - Cluster ranked sequences around abundant seeds by edit distance

pub mod cluster;
pub mod command;
pub mod common;
