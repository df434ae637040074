//! Output rendering helpers.
//!
//! This module provides tools for turning notebook outputs into markup:
//! - ANSI escape conversion and stripping for streams and tracebacks
//! - MIME representation selection for rich outputs
//!
//! # Example
//!
//! ```
//! use nbview::notebook::MimeBundle;
//! use nbview::output::{ansi_to_html, select_representation, strip_ansi, Representation};
//!
//! let raw = b"\x1b[31mRed text\x1b[0m";
//! assert_eq!(strip_ansi(raw), "Red text");
//! assert_eq!(
//!     ansi_to_html("\x1b[1mbold\x1b[0m"),
//!     r#"<span style="font-weight:bold">bold</span>"#
//! );
//!
//! let bundle: MimeBundle = [("text/plain", "42")].into_iter().collect();
//! assert_eq!(select_representation(&bundle), Representation::Text("42"));
//! ```

mod ansi;
mod dispatch;

pub use ansi::{ansi_to_html, strip_ansi, strip_ansi_str};
pub use dispatch::{select_representation, Representation, PREFERENCE_ORDER};
