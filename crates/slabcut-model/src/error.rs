//! Error types shared across the SlabCut crates.

use thiserror::Error;

/// Errors surfaced by the SlabCut core.
///
/// A part that does not fit on any stock is not an error: it ends up in
/// [`crate::OptimizeResult::unplaced`] and packing continues.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user input (non-positive dimension, bad quantity, malformed settings).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row-located import failure.
    #[error("import error at line {line}: {message}")]
    Import { line: usize, message: String },
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
