//! Notebook file loading.
//!
//! Reads a local `.ipynb` file and validates it. A single read is attempted
//! under a timeout; failures are reported, never retried.

use std::io::ErrorKind;
use std::path::{Component, Path};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{FormatError, LoadError};
use crate::notebook::{self, Notebook};

/// Default load timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Expected notebook file extension.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Options for [`load_notebook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum time for reading the file.
    pub timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LoadOptions {
    /// Set the load timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Set the load timeout in milliseconds.
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }
}

/// Whether `path` has a `.ipynb` extension (any case).
pub fn has_notebook_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTEBOOK_EXTENSION))
}

/// Load and validate a notebook file.
///
/// # Errors
///
/// - [`LoadError::InvalidExtension`] if the path does not end in `.ipynb`
/// - [`LoadError::NotFound`] / [`LoadError::Forbidden`] / [`LoadError::Io`]
///   when the file cannot be read
/// - [`LoadError::Timeout`] when the read exceeds `options.timeout`
/// - [`LoadError::Empty`] for an empty or whitespace-only file
/// - [`LoadError::Format`] when the content is not a valid notebook
pub async fn load_notebook(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Notebook, LoadError> {
    let path = path.as_ref();

    if !has_notebook_extension(path) {
        return Err(LoadError::InvalidExtension(path.to_path_buf()));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        warn!(path = %path.display(), "Notebook path contains parent directory references");
    }

    debug!(path = %path.display(), timeout_ms = options.timeout.as_millis() as u64, "Loading notebook");

    let content = match tokio::time::timeout(options.timeout, tokio::fs::read_to_string(path)).await
    {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => return Err(map_io_error(path, e)),
        Err(_) => {
            warn!(path = %path.display(), "Timed out loading notebook");
            return Err(LoadError::Timeout {
                path: path.to_path_buf(),
                timeout_ms: options.timeout.as_millis() as u64,
            });
        }
    };

    if content.trim().is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let notebook = notebook::parse(content.as_str()).map_err(|source: FormatError| {
        LoadError::Format {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!(
        path = %path.display(),
        cells = notebook.cells().len(),
        "Notebook loaded"
    );
    Ok(notebook)
}

fn map_io_error(path: &Path, error: std::io::Error) -> LoadError {
    let path = path.to_path_buf();
    match error.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path),
        ErrorKind::PermissionDenied => LoadError::Forbidden(path),
        _ => LoadError::Io {
            path,
            source: error,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    const MINIMAL: &str = r##"{"nbformat": 4, "nbformat_minor": 5, "metadata": {}, "cells": [
        {"cell_type": "markdown", "metadata": {}, "source": ["# Title"]}
    ]}"##;

    fn notebook_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".ipynb").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_options() {
        assert_eq!(LoadOptions::default().timeout, DEFAULT_TIMEOUT);
        assert_eq!(
            LoadOptions::default().timeout_ms(250).timeout,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_extension_check() {
        assert!(has_notebook_extension(Path::new("a/b.ipynb")));
        assert!(has_notebook_extension(Path::new("B.IPYNB")));
        assert!(!has_notebook_extension(Path::new("notes.json")));
        assert!(!has_notebook_extension(Path::new("ipynb")));
    }

    #[tokio::test]
    async fn test_load_valid_notebook() {
        let file = notebook_file(MINIMAL);
        let notebook = load_notebook(file.path(), &LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(notebook.cells().len(), 1);
        assert_eq!(notebook.cells()[0].source(), "# Title");
    }

    #[tokio::test]
    async fn test_wrong_extension() {
        let result = load_notebook("notebook.json", &LoadOptions::default()).await;
        assert!(matches!(result, Err(LoadError::InvalidExtension(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ipynb");
        let result = load_notebook(&path, &LoadOptions::default()).await;
        assert!(matches!(result, Err(LoadError::NotFound(p)) if p == path));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let file = notebook_file("  \n\t ");
        let result = load_notebook(file.path(), &LoadOptions::default()).await;
        assert!(matches!(result, Err(LoadError::Empty(_))));
    }

    #[tokio::test]
    async fn test_invalid_content() {
        let file = notebook_file(r#"{"nbformat": 3, "cells": []}"#);
        let err = load_notebook(file.path(), &LoadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Format {
                source: FormatError::UnsupportedVersion(_),
                ..
            }
        ));
        assert!(err.to_string().starts_with("invalid notebook format in file"));
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = Builder::new().suffix(".ipynb").tempdir().unwrap();
        let result = load_notebook(dir.path(), &LoadOptions::default()).await;
        assert!(result.is_err());
        assert!(!matches!(result, Err(LoadError::Empty(_))));
    }
}
