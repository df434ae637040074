//! Syntax coloring for code cell sources.
//!
//! [`tokenize`] splits a source string into classified tokens; [`highlight`]
//! attaches palette colors, and [`highlight_html`] renders them as inline
//! styled markup.
//!
//! ```
//! use nbview::highlight::{highlight_html, Palette};
//!
//! let html = highlight_html("x = 1", &Palette::dark());
//! assert!(html.starts_with(r#"<span style="color:#9CDCFE">x</span> "#));
//! ```

mod palette;
mod tokenizer;

pub use palette::{Palette, Theme};
pub use tokenizer::{tokenize, Lexer, Token, TokenKind};

/// A piece of colored source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight<'a> {
    /// Whitespace, emitted as-is.
    Plain(&'a str),
    /// Styled text; `bold` is set for keywords only.
    Styled {
        text: &'a str,
        color: &'static str,
        bold: bool,
    },
}

impl<'a> Highlight<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Self::Plain(text) => text,
            Self::Styled { text, .. } => text,
        }
    }
}

/// Tokenize `source` and color each token with `palette`.
pub fn highlight<'a>(source: &'a str, palette: &Palette) -> Vec<Highlight<'a>> {
    tokenize(source)
        .into_iter()
        .map(|token| {
            if token.is_whitespace() {
                Highlight::Plain(token.text)
            } else {
                Highlight::Styled {
                    text: token.text,
                    color: palette.color(token.kind),
                    bold: token.kind == TokenKind::Keyword,
                }
            }
        })
        .collect()
}

/// Render `source` as HTML spans with inline colors.
///
/// Token text is HTML-escaped; whitespace is not wrapped.
pub fn highlight_html(source: &str, palette: &Palette) -> String {
    let mut html = String::with_capacity(source.len() * 4);
    for piece in highlight(source, palette) {
        match piece {
            Highlight::Plain(text) => html.push_str(text),
            Highlight::Styled { text, color, bold } => {
                html.push_str("<span style=\"color:");
                html.push_str(color);
                if bold {
                    html.push_str(";font-weight:bold");
                }
                html.push_str("\">");
                push_escaped(&mut html, text);
                html.push_str("</span>");
            }
        }
    }
    html
}

/// Append `text` with `&`, `<`, `>` and `"` escaped.
pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// `text` with HTML special characters escaped.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_plain() {
        let pieces = highlight("if  x:\n", &Palette::dark());
        assert_eq!(pieces[1], Highlight::Plain("  "));
        assert_eq!(pieces.last(), Some(&Highlight::Plain("\n")));
    }

    #[test]
    fn test_only_keywords_bold() {
        let pieces = highlight("def f(): return len", &Palette::light());
        let bold: Vec<&str> = pieces
            .iter()
            .filter_map(|piece| match piece {
                Highlight::Styled {
                    text, bold: true, ..
                } => Some(*text),
                _ => None,
            })
            .collect();
        assert_eq!(bold, vec!["def", "return"]);
    }

    #[test]
    fn test_highlight_preserves_text() {
        let source = "print('a < b')  # done\n";
        let joined: String = highlight(source, &Palette::dark())
            .iter()
            .map(Highlight::text)
            .collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_highlight_html_escapes() {
        let html = highlight_html("a<b", &Palette::dark());
        assert_eq!(
            html,
            concat!(
                r#"<span style="color:#9CDCFE">a</span>"#,
                r#"<span style="color:#D4D4D4">&lt;</span>"#,
                r#"<span style="color:#9CDCFE">b</span>"#
            )
        );
    }

    #[test]
    fn test_highlight_html_keyword_style() {
        assert_eq!(
            highlight_html("None", &Palette::dark()),
            r#"<span style="color:#C586C0;font-weight:bold">None</span>"#
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
