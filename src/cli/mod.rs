//! CLI support for jsonpath-transform
//!
//! Provides programmatic access to the `jpt` commands for embedding in other
//! tools.

mod check;
mod run;

pub use check::execute_check;
pub use run::{RunOptions, execute_run, load_spec};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or applying the specification failed
    #[error("Transform error: {0}")]
    Transform(#[from] crate::TransformError),

    /// Input document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
