//! HTML fragment rendering for whole notebooks.
//!
//! Composes the validator output, syntax coloring, MIME dispatch, ANSI
//! conversion and sanitization into one embeddable fragment. Markup built
//! here is trusted; every piece of notebook content either goes through
//! [`escape_html`] or through the [`HtmlSanitizer`].

use std::fmt::Write as _;

use pulldown_cmark::{html, Options, Parser};

use crate::highlight::{escape_html, highlight_html, Palette, Theme};
use crate::notebook::{Cell, CodeCell, ErrorOutput, Notebook, Output, StreamOutput};
use crate::output::{ansi_to_html, select_representation, strip_ansi_str, Representation};
use crate::security::{HtmlSanitizer, SanitizeOptions};

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Color theme for code cells.
    pub theme: Theme,
    /// Render code cell outputs.
    pub show_outputs: bool,
    /// Strip ANSI codes instead of converting them to spans.
    pub plain_ansi: bool,
    /// Sanitizer settings for markdown and HTML outputs.
    pub sanitize: SanitizeOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            show_outputs: true,
            plain_ansi: false,
            sanitize: SanitizeOptions::default(),
        }
    }
}

/// Notebook to HTML renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    palette: Palette,
    show_outputs: bool,
    plain_ansi: bool,
    sanitizer: HtmlSanitizer,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            palette: options.theme.palette(),
            show_outputs: options.show_outputs,
            plain_ansi: options.plain_ansi,
            sanitizer: HtmlSanitizer::new(options.sanitize),
        }
    }

    pub fn sanitizer(&self) -> &HtmlSanitizer {
        &self.sanitizer
    }

    /// Render every cell in document order.
    pub fn render_notebook(&self, notebook: &Notebook) -> String {
        let mut html = format!(
            "<div class=\"notebook\" data-language=\"{}\">\n",
            escape_html(notebook.primary_language())
        );
        for cell in notebook.cells() {
            html.push_str(&self.render_cell(cell));
            html.push('\n');
        }
        html.push_str("</div>\n");
        html
    }

    pub fn render_cell(&self, cell: &Cell) -> String {
        match cell {
            Cell::Code(code) => self.render_code_cell(code),
            Cell::Markdown(text) => format!(
                "<div class=\"cell markdown-cell\">{}</div>",
                render_markdown(&text.source, &self.sanitizer)
            ),
            Cell::Raw(text) => format!(
                "<div class=\"cell raw-cell\"><pre>{}</pre></div>",
                escape_html(&text.source)
            ),
        }
    }

    fn render_code_cell(&self, cell: &CodeCell) -> String {
        let prompt = match cell.execution_count() {
            Some(count) => format!("In [{count}]:"),
            None => "In [ ]:".to_string(),
        };

        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"cell code-cell\"><div class=\"prompt\">{prompt}</div>\
             <pre class=\"source\" style=\"background:{}\"><code>{}</code></pre>",
            self.palette.background,
            highlight_html(&cell.source, &self.palette)
        );

        if self.show_outputs && !cell.outputs().is_empty() {
            html.push_str("<div class=\"outputs\">");
            for output in cell.outputs() {
                html.push_str(&self.render_output(output));
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
        html
    }

    pub fn render_output(&self, output: &Output) -> String {
        match output {
            Output::Stream(stream) => self.render_stream(stream),
            Output::Error(error) => self.render_error(error),
            Output::DisplayData(_) | Output::ExecuteResult(_) => {
                let repr = output
                    .mime_bundle()
                    .map(select_representation)
                    .unwrap_or(Representation::Unsupported);
                self.render_representation(&repr)
            }
        }
    }

    fn render_stream(&self, stream: &StreamOutput) -> String {
        format!(
            "<pre class=\"output stream {}\">{}</pre>",
            stream.name(),
            self.terminal_text(stream.text())
        )
    }

    fn render_error(&self, error: &ErrorOutput) -> String {
        let traceback = error.traceback().join("\n");
        format!(
            "<div class=\"output error\"><div class=\"error-name\">{}: {}</div><pre>{}</pre></div>",
            escape_html(error.name()),
            escape_html(error.value()),
            self.terminal_text(&traceback)
        )
    }

    /// Escaped terminal text, with ANSI colors converted or stripped.
    fn terminal_text(&self, text: &str) -> String {
        if self.plain_ansi {
            escape_html(&strip_ansi_str(text))
        } else {
            // Escaping first leaves SGR sequences intact and keeps
            // tracebacks like `<module>` as visible text.
            ansi_to_html(&escape_html(text))
        }
    }

    fn render_representation(&self, repr: &Representation<'_>) -> String {
        if let Some(uri) = repr.data_uri() {
            return format!(
                "<div class=\"output image\"><img src=\"{}\" alt=\"output\"></div>",
                escape_html(&uri)
            );
        }
        match repr {
            Representation::Html(_) => format!(
                "<div class=\"output html\">{}</div>",
                repr.sanitized_html(&self.sanitizer).unwrap_or_default()
            ),
            Representation::Json(json) => {
                format!("<pre class=\"output json\">{}</pre>", escape_html(json))
            }
            Representation::Text(text) => {
                format!("<pre class=\"output text\">{}</pre>", self.terminal_text(text))
            }
            _ => "<div class=\"output unsupported\">Unsupported output format</div>".to_string(),
        }
    }
}

/// Render markdown to sanitized HTML.
pub fn render_markdown(markdown: &str, sanitizer: &HtmlSanitizer) -> String {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    sanitizer.sanitize(&html_output)
}

/// One-line-per-field text summary of a notebook.
pub fn render_summary(notebook: &Notebook) -> String {
    let counts = notebook.count_cells_by_type();
    format!(
        "format: {}.{}\nlanguage: {}\ncells: {} (code: {}, markdown: {}, raw: {})\n",
        notebook.format_version(),
        notebook.format_minor(),
        notebook.primary_language(),
        counts.total,
        counts.code,
        counts.markdown,
        counts.raw
    )
}
