//! Unified error type for snapshot analysis and loading.

use thiserror::Error;

/// All errors that can occur while loading or analyzing a `.git` directory.
///
/// Malformed lines and files are not errors: parsers skip them. Only a
/// failure to obtain bytes at all aborts an analysis run.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Pipeline-level failure: a file's bytes could not be read during analysis
    #[error("Analysis failed while reading '{path}': {source}")]
    AnalysisFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error outside an analysis run (directory walk, metadata)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// No `.git` control directory at the given path
    #[error("No git directory found at '{0}' (expected a .git directory or a HEAD file)")]
    GitDirNotFound(String),

    /// Loader cap reached with strict limits enabled
    #[error("Loader limit exceeded: more than {limit} {kind}")]
    LimitExceeded { kind: &'static str, limit: u64 },

    /// Argument validation error
    #[error("{0}")]
    InvalidArgs(String),
}
