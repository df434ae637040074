//! Content safety for untrusted notebook markup.
//!
//! Notebook outputs and markdown cells can carry arbitrary HTML. Everything
//! that reaches a rendered page goes through [`HtmlSanitizer`] first.
//!
//! ## Features
//!
//! - **Tag allow-list**: unknown elements are dropped, their text kept
//! - **Attribute allow-list**: per tag, plus global `class`/`id`
//! - **URL scheme deny-list**: `javascript:`, `vbscript:`, `data:text/html`
//!
//! ## Example
//!
//! ```rust
//! use nbview::security::{HtmlSanitizer, SanitizeOptions};
//!
//! let sanitizer = HtmlSanitizer::default();
//! let clean = sanitizer.sanitize(r#"<a href="javascript:alert(1)">x</a><script>y()</script>"#);
//! assert_eq!(clean, "<a>x</a>");
//!
//! let strict = HtmlSanitizer::new(SanitizeOptions::strict());
//! assert!(!strict.is_safe_url("file:///etc/passwd"));
//! ```

pub mod html;
pub mod url;

pub use html::{
    sanitize_html, HtmlSanitizer, SanitizeOptions, DEFAULT_ALLOWED_TAGS, GLOBAL_ATTRIBUTES,
};
pub use url::{has_blocked_scheme, DEFAULT_BLOCKED_SCHEMES};
