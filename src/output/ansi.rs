//! ANSI escape handling for stream and traceback text.
//!
//! Two renderings are offered:
//! - [`ansi_to_html`] turns SGR color/style codes into nested `<span>` markup
//! - [`strip_ansi`] drops every control sequence and keeps the plain text

use once_cell::sync::Lazy;
use regex::Regex;
use vte::{Parser, Perform};

/// SGR sequence, either ESC-prefixed or with the ESC already lost.
static SGR_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\x1b\[|\[)((?:\d+;)*\d+)m").expect("valid SGR pattern"));

const BOLD_SPAN: &str = r#"<span style="font-weight:bold">"#;
const UNDERLINE_SPAN: &str = r#"<span style="text-decoration:underline">"#;
const CLOSE_SPAN: &str = "</span>";

/// Foreground color for an SGR code (30-37 normal, 90-97 bright).
fn foreground_color(code: u32) -> Option<&'static str> {
    let color = match code {
        30 => "#000000",
        31 => "#cd3131",
        32 => "#0dbc79",
        33 => "#e5e510",
        34 => "#2472c8",
        35 => "#bc3fbc",
        36 => "#11a8cd",
        37 => "#e5e5e5",
        90 => "#666666",
        91 => "#f14c4c",
        92 => "#23d18b",
        93 => "#f5f543",
        94 => "#3b8eea",
        95 => "#d670d6",
        96 => "#29b8db",
        97 => "#ffffff",
        _ => return None,
    };
    Some(color)
}

/// Markup writer tracking how many spans are open.
struct SpanWriter {
    output: String,
    open: usize,
}

impl SpanWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            open: 0,
        }
    }

    fn text(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn open(&mut self, markup: &str) {
        self.output.push_str(markup);
        self.open += 1;
    }

    /// Reset closes every open span, not just the innermost one.
    fn close_all(&mut self) {
        for _ in 0..self.open {
            self.output.push_str(CLOSE_SPAN);
        }
        self.open = 0;
    }

    fn apply(&mut self, code: u32) {
        match code {
            0 => self.close_all(),
            1 => self.open(BOLD_SPAN),
            4 => self.open(UNDERLINE_SPAN),
            _ => {
                if let Some(color) = foreground_color(code) {
                    self.open(&format!(r#"<span style="color:{color}">"#));
                }
            }
        }
    }

    fn finish(mut self) -> String {
        self.close_all();
        self.output
    }
}

/// Convert ANSI SGR codes in `text` to `<span>` markup.
///
/// Recognized codes: `0` (reset, closes all open spans), `1` (bold),
/// `4` (underline), `30-37`/`90-97` (foreground color). Other codes are
/// dropped. Spans still open at the end of the text are closed.
///
/// Text between sequences is copied unchanged and is *not* HTML-escaped;
/// run the result through the HTML sanitizer before embedding untrusted
/// text.
pub fn ansi_to_html(text: &str) -> String {
    let mut writer = SpanWriter::with_capacity(text.len());
    let mut last = 0;

    for captures in SGR_SEQUENCE.captures_iter(text) {
        let (Some(sequence), Some(codes)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        writer.text(&text[last..sequence.start()]);
        for code in codes.as_str().split(';') {
            // Codes too large for u32 are as unknown as any other.
            if let Ok(code) = code.parse::<u32>() {
                writer.apply(code);
            }
        }
        last = sequence.end();
    }
    writer.text(&text[last..]);

    writer.finish()
}

/// Strip ANSI escape codes from raw bytes.
///
/// Returns UTF-8 text with every escape, OSC and DCS sequence removed.
/// Newlines, carriage returns and tabs are kept; other C0 controls are not.
pub fn strip_ansi(input: &[u8]) -> String {
    let mut text = PrintableText::default();
    Parser::new().advance(&mut text, input);
    text.0
}

/// Strip ANSI codes from a string.
pub fn strip_ansi_str(input: &str) -> String {
    strip_ansi(input.as_bytes())
}

/// Collects printed characters; every sequence dispatch falls through to
/// the no-op defaults of [`Perform`].
#[derive(Default)]
struct PrintableText(String);

impl Perform for PrintableText {
    fn print(&mut self, c: char) {
        self.0.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if let b'\n' | b'\r' | b'\t' = byte {
            self.0.push(char::from(byte));
        }
    }
}
