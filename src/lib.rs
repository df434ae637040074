//! # nbview
//!
//! Safe rendering of Jupyter notebooks (nbformat v4) into embeddable markup.
//!
//! This crate takes raw notebook JSON, validates and normalizes it, and
//! provides the pieces needed to display it without trusting its content.
//!
//! ## Features
//!
//! - **Validation**: canonical [`Notebook`] model with typed cells and outputs
//! - **MIME dispatch**: one representation per rich output, by fixed preference
//! - **ANSI conversion**: terminal colors in streams and tracebacks as spans
//! - **HTML sanitization**: allow-list filtering of untrusted markup
//! - **Syntax coloring**: lossless tokenizer with dark and light palettes
//!
//! ## Quick Start
//!
//! ```no_run
//! use nbview::{load_notebook, LoadOptions, Renderer};
//!
//! #[tokio::main]
//! async fn main() -> nbview::Result<()> {
//!     // Initialize logging
//!     nbview::logging::try_init().ok();
//!
//!     let notebook = load_notebook("analysis.ipynb", &LoadOptions::default()).await?;
//!     println!("{} cells", notebook.cells().len());
//!
//!     let html = Renderer::default().render_notebook(&notebook);
//!     println!("{html}");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod logging;
pub mod notebook;
pub mod output;
pub mod render;
pub mod security;

// Re-export commonly used types
pub use error::{FormatError, LoadError, NbviewError, Result};
pub use highlight::{highlight, highlight_html, tokenize, Palette, Theme, Token, TokenKind};
pub use loader::{load_notebook, LoadOptions};
pub use notebook::{parse, Cell, CellType, MimeBundle, Notebook, Output};
pub use output::{ansi_to_html, select_representation, strip_ansi, Representation};
pub use render::{RenderOptions, Renderer};
pub use security::{sanitize_html, HtmlSanitizer, SanitizeOptions};
