//! Allow-list HTML sanitization for notebook outputs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::url::{has_blocked_scheme, DEFAULT_BLOCKED_SCHEMES};

/// Tags kept by the default configuration.
pub const DEFAULT_ALLOWED_TAGS: [&str; 32] = [
    "p", "div", "span", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "b", "em", "i",
    "u", "code", "pre", "ul", "ol", "li", "table", "thead", "tbody", "tr", "th", "td", "a", "img",
    "blockquote", "sub", "sup",
];

/// Key in [`SanitizeOptions::allowed_attributes`] for attributes allowed on every tag.
pub const GLOBAL_ATTRIBUTES: &str = "*";

/// Script, style and link elements are deleted wholesale, content included.
static DANGEROUS_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<link\b[^>]*>")
        .expect("valid dangerous-block pattern")
});

/// An element tag, comment, doctype or processing instruction. A lone
/// quote is accepted as content so an unterminated attribute value cannot
/// hide the end of the tag.
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<(?:(/)?([A-Za-z][A-Za-z0-9-]*)|[!?])((?:[^>"']|"[^"]*"|'[^']*'|["'])*)>"#,
    )
    .expect("valid tag pattern")
});

/// Anything between `<` and the next `>`, used when stripping all markup.
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid strip pattern"));

/// One attribute: name, optionally followed by a quoted or bare value.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute pattern")
});

/// Sanitizer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Remove every tag and return plain text.
    pub strip_tags: bool,
    /// Lowercase tag names to keep.
    pub allowed_tags: Vec<String>,
    /// Per-tag attribute names to keep; the `*` entry applies to all tags.
    pub allowed_attributes: HashMap<String, Vec<String>>,
    /// URL scheme prefixes rejected in `href`/`src`.
    pub blocked_schemes: Vec<String>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        let attributes: [(&str, &[&str]); 6] = [
            ("a", &["href", "title", "target", "rel"]),
            ("img", &["src", "alt", "width", "height", "title"]),
            ("td", &["colspan", "rowspan"]),
            ("th", &["colspan", "rowspan"]),
            ("span", &["style"]),
            (GLOBAL_ATTRIBUTES, &["class", "id"]),
        ];

        Self {
            strip_tags: false,
            allowed_tags: to_strings(&DEFAULT_ALLOWED_TAGS),
            allowed_attributes: attributes
                .iter()
                .map(|(tag, names)| (tag.to_string(), to_strings(names)))
                .collect(),
            blocked_schemes: to_strings(&DEFAULT_BLOCKED_SCHEMES),
        }
    }
}

impl SanitizeOptions {
    /// Defaults plus `file:` and every `data:` URL blocked, and no inline styles.
    pub fn strict() -> Self {
        let mut options = Self::default()
            .with_blocked_scheme("file:")
            .with_blocked_scheme("data:");
        options.allowed_attributes.remove("span");
        options
    }

    /// Remove all markup.
    pub fn plain_text() -> Self {
        Self {
            strip_tags: true,
            ..Self::default()
        }
    }

    /// Also reject URLs starting with `scheme`.
    pub fn with_blocked_scheme(mut self, scheme: impl Into<String>) -> Self {
        let scheme = scheme.into().to_ascii_lowercase();
        if !self.blocked_schemes.contains(&scheme) {
            self.blocked_schemes.push(scheme);
        }
        self
    }
}

/// HTML sanitizer.
///
/// Tags are filtered against an allow-list, so unknown elements fail
/// closed. URL attributes are filtered against a scheme deny-list (see
/// [`super::url`]), which only covers the configured schemes. Inline
/// `style` values on spans are kept without CSS validation.
#[derive(Debug, Clone, Default)]
pub struct HtmlSanitizer {
    options: SanitizeOptions,
}

impl HtmlSanitizer {
    /// Create a sanitizer with the given options.
    pub fn new(options: SanitizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SanitizeOptions {
        &self.options
    }

    /// Sanitize an HTML fragment.
    ///
    /// 1. Script/style blocks and link elements are deleted.
    /// 2. Tags not on the allow-list are removed (their text content stays).
    /// 3. Opening tags keep only allowed attributes, and `href`/`src`
    ///    values with a blocked scheme are dropped.
    ///
    /// Closing tags of allowed elements are not passed through verbatim:
    /// each one is re-emitted as a bare lowercase `</tag>`, dropping any
    /// whitespace or attributes the input carried. A `<` in text that does
    /// not start a tag is escaped as `&lt;`. Together these keep removal
    /// from splicing a new tag together, so `sanitize(sanitize(x))` equals
    /// `sanitize(x)`.
    pub fn sanitize(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }
        if self.options.strip_tags {
            return ANY_TAG.replace_all(html, "").into_owned();
        }

        let source = DANGEROUS_BLOCKS.replace_all(html, "");
        let mut output = String::with_capacity(source.len());
        let mut last = 0;
        for caps in TAG.captures_iter(&source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut output, &source[last..whole.start()]);
            if let Some(tag) = self.filter_tag(&caps) {
                output.push_str(&tag);
            }
            last = whole.end();
        }
        push_text(&mut output, &source[last..]);
        output
    }

    /// Whether `tag` (any case) is on the allow-list.
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        let tag = tag.to_ascii_lowercase();
        self.options.allowed_tags.iter().any(|allowed| *allowed == tag)
    }

    /// Whether `attribute` may appear on `tag`, counting global attributes.
    pub fn is_attribute_allowed(&self, tag: &str, attribute: &str) -> bool {
        let tag = tag.to_ascii_lowercase();
        let attribute = attribute.to_ascii_lowercase();
        [tag.as_str(), GLOBAL_ATTRIBUTES]
            .iter()
            .filter_map(|key| self.options.allowed_attributes.get(*key))
            .flatten()
            .any(|allowed| *allowed == attribute)
    }

    /// Whether a URL attribute value passes the scheme deny-list.
    pub fn is_safe_url(&self, value: &str) -> bool {
        !has_blocked_scheme(value, &self.options.blocked_schemes)
    }

    /// Rebuilt tag, or `None` when the tag is dropped.
    fn filter_tag(&self, caps: &Captures<'_>) -> Option<String> {
        let name = caps.get(2)?.as_str();
        if !self.is_tag_allowed(name) {
            return None;
        }

        let tag = name.to_ascii_lowercase();
        if caps.get(1).is_some() {
            return Some(format!("</{tag}>"));
        }

        let mut rebuilt = format!("<{tag}");
        let raw_attributes = caps.get(3).map_or("", |m| m.as_str());
        for attr in ATTRIBUTE.captures_iter(raw_attributes) {
            let attr_name = attr[1].to_ascii_lowercase();
            let Some(value) = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4)) else {
                continue;
            };
            if !self.is_attribute_allowed(&tag, &attr_name) {
                continue;
            }
            if matches!(attr_name.as_str(), "href" | "src") && !self.is_safe_url(value.as_str()) {
                continue;
            }
            rebuilt.push_str(&format!(" {attr_name}=\"{}\"", escape_attribute(value.as_str())));
        }
        rebuilt.push('>');
        Some(rebuilt)
    }
}

/// Sanitize with the default options.
pub fn sanitize_html(html: &str) -> String {
    static DEFAULT: Lazy<HtmlSanitizer> = Lazy::new(HtmlSanitizer::default);
    DEFAULT.sanitize(html)
}

fn push_text(output: &mut String, text: &str) {
    output.push_str(&text.replace('<', "&lt;"));
}

/// Escape the characters that could end a double-quoted attribute or open a tag.
fn escape_attribute(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
