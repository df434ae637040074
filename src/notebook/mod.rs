//! Notebook model and validator.
//!
//! Raw nbformat JSON goes in, a canonical [`Notebook`] comes out:
//! - multiline fields (`source`, stream `text`, MIME payloads) joined into one string
//! - metadata maps always present
//! - cells and outputs as closed enums
//!
//! # Example
//!
//! ```
//! use nbview::notebook::{parse, CellType};
//!
//! let notebook = parse(r#"{
//!     "nbformat": 4,
//!     "nbformat_minor": 5,
//!     "metadata": {},
//!     "cells": [{"cell_type": "code", "source": ["print(", "1)"], "outputs": []}]
//! }"#).unwrap();
//!
//! assert_eq!(notebook.cells()[0].cell_type(), CellType::Code);
//! assert_eq!(notebook.cells()[0].source(), "print(1)");
//! assert_eq!(notebook.primary_language(), "python");
//! ```

mod model;
mod parse;
mod query;

pub use model::{
    Cell, CellType, CodeCell, DisplayData, ErrorOutput, ExecuteResult, Metadata, MimeBundle,
    MimeData, Notebook, Output, StreamName, StreamOutput, TextCell,
};
pub use parse::{is_valid, parse, NotebookInput, MIN_FORMAT_VERSION};
pub use query::{CellCounts, DEFAULT_LANGUAGE};
