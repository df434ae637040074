//! Error types for nbview.

use std::path::PathBuf;

use thiserror::Error;

/// A notebook document that is malformed or uses an unsupported format.
///
/// Always fatal to the parse call: the validator never returns a
/// partially valid notebook.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Input text is not valid JSON.
    #[error("invalid JSON in notebook: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Top-level value is not a JSON object.
    #[error("notebook must be an object")]
    NotAnObject,

    /// `nbformat` is missing or not a number.
    #[error("notebook must have a numeric nbformat field")]
    MissingVersion,

    /// `nbformat` is below 4.
    #[error("unsupported notebook format version: {0}; only version 4 and above are supported")]
    UnsupportedVersion(f64),

    /// `cells` is missing or not an array.
    #[error("notebook must have a cells array")]
    MissingCells,

    /// A cell is not a JSON object.
    #[error("cell at index {index} must be an object")]
    CellNotAnObject { index: usize },

    /// A cell has a `cell_type` other than code, markdown or raw.
    #[error("cell at index {index} has invalid cell_type: {found}")]
    InvalidCellType { index: usize, found: String },

    /// An output is not a JSON object.
    #[error("output at cell {cell}, output {output} must be an object")]
    OutputNotAnObject { cell: usize, output: usize },

    /// An output has an unrecognized `output_type`.
    #[error("output at cell {cell}, output {output} has invalid output_type: {found}")]
    InvalidOutputType {
        cell: usize,
        output: usize,
        found: String,
    },
}

/// Failure to load a notebook file from disk.
///
/// The loader never retries; the caller decides whether to.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Path does not end in `.ipynb`.
    #[error("invalid file extension, expected .ipynb file: {0}")]
    InvalidExtension(PathBuf),

    /// File does not exist.
    #[error("notebook file not found: {0}")]
    NotFound(PathBuf),

    /// File exists but cannot be read with current permissions.
    #[error("access denied to notebook file: {0}")]
    Forbidden(PathBuf),

    /// Read did not complete within the configured timeout.
    #[error("timeout loading notebook file after {timeout_ms}ms: {path}")]
    Timeout { path: PathBuf, timeout_ms: u64 },

    /// File is empty or whitespace only.
    #[error("notebook file is empty: {0}")]
    Empty(PathBuf),

    /// Any other I/O failure.
    #[error("failed to load notebook file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content was read but is not a valid notebook.
    #[error("invalid notebook format in file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// Main error type for nbview operations.
#[derive(Error, Debug)]
pub enum NbviewError {
    /// Notebook validation failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Notebook could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Command-line arguments were invalid.
    #[error("argument error: {0}")]
    Args(#[from] crate::cli::ArgsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for nbview operations.
pub type Result<T> = std::result::Result<T, NbviewError>;
