//! Notebook pipeline integration tests.
//!
//! These tests exercise the public API across modules: validation, MIME
//! dispatch, ANSI conversion, sanitization, tokenization and loading.

use std::io::Write;

use serde_json::json;
use tempfile::Builder;

use nbview::notebook::{is_valid, Cell, MimeData, Output, StreamName};
use nbview::output::strip_ansi_str;
use nbview::{
    ansi_to_html, highlight_html, load_notebook, parse, sanitize_html, select_representation,
    tokenize, CellType, FormatError, HtmlSanitizer, LoadError, LoadOptions, MimeBundle, Palette,
    Renderer, Representation, SanitizeOptions,
};

// ============================================================================
// Validator Tests
// ============================================================================

#[test]
fn test_version_floor() {
    let old = json!({"nbformat": 3, "nbformat_minor": 0, "metadata": {}, "cells": []});
    assert!(matches!(
        parse(&old),
        Err(FormatError::UnsupportedVersion(v)) if v == 3.0
    ));

    let minimal = json!({"nbformat": 4, "nbformat_minor": 0, "metadata": {}, "cells": []});
    let notebook = parse(&minimal).unwrap();
    assert!(notebook.cells().is_empty());
    assert_eq!(notebook.format_version(), 4);
}

#[test]
fn test_fragment_joining() {
    let doc = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{"cell_type": "code", "source": ["a", "b", "c"], "metadata": {}, "outputs": []}]
    });
    let notebook = parse(&doc).unwrap();
    assert_eq!(notebook.cells()[0].source(), "abc");
}

#[test]
fn test_unknown_cell_type_rejected() {
    let doc = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{"cell_type": "unknown", "source": "", "metadata": {}}]
    });
    assert!(matches!(
        parse(&doc),
        Err(FormatError::InvalidCellType { index: 0, .. })
    ));
    assert!(!is_valid(&doc));
}

#[test]
fn test_unknown_output_type_rejected() {
    let doc = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{
            "cell_type": "code",
            "source": "",
            "metadata": {},
            "outputs": [{"output_type": "clear_output"}]
        }]
    });
    assert!(matches!(
        parse(&doc),
        Err(FormatError::InvalidOutputType { cell: 0, output: 0, .. })
    ));
    assert!(!is_valid(&doc));
}

#[test]
fn test_text_and_value_inputs_agree() {
    let text = r#"{"nbformat": 4.0, "nbformat_minor": 2, "metadata": {"custom": {"k": 1}},
        "cells": [{"cell_type": "markdown", "source": "hello"}]}"#;
    let value: serde_json::Value = serde_json::from_str(text).unwrap();

    let from_text = parse(text).unwrap();
    let from_value = parse(&value).unwrap();
    assert_eq!(from_text, from_value);
    assert_eq!(from_text.metadata()["custom"], json!({"k": 1}));
    assert_eq!(from_text.cells()[0].cell_type(), CellType::Markdown);
}

#[test]
fn test_full_notebook_canonicalized() {
    let doc = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {"language_info": {"name": "julia"}},
        "cells": [{
            "cell_type": "code",
            "id": "c1",
            "execution_count": 2,
            "metadata": {"tags": ["x"]},
            "source": ["x = 1\n", "x"],
            "outputs": [
                {"output_type": "stream", "name": "stderr", "text": ["warn", "ing"]},
                {"output_type": "execute_result", "execution_count": 2, "metadata": {},
                 "data": {"text/plain": ["1", "\n"], "application/json": {"v": [1]}}},
                {"output_type": "error", "ename": "E", "evalue": "bad", "traceback": ["t1", "t2"]}
            ]
        }]
    });
    let notebook = parse(&doc).unwrap();
    assert_eq!(notebook.primary_language(), "julia");

    let Cell::Code(code) = &notebook.cells()[0] else {
        panic!("expected code cell");
    };
    assert_eq!(notebook.cells()[0].id(), Some("c1"));
    assert_eq!(code.execution_count(), Some(2));

    let outputs = code.outputs();
    assert!(matches!(&outputs[0], Output::Stream(s) if s.name() == StreamName::Stderr && s.text() == "warning"));
    let bundle = outputs[1].mime_bundle().unwrap();
    assert_eq!(bundle.get("text/plain").and_then(MimeData::as_text), Some("1\n"));
    assert_eq!(bundle.get("application/json"), Some(&MimeData::Json(json!({"v": [1]}))));
    assert!(matches!(&outputs[2], Output::Error(e) if e.traceback() == ["t1", "t2"]));
}

// ============================================================================
// Dispatcher Tests
// ============================================================================

#[test]
fn test_dispatcher_preference() {
    let both: MimeBundle = [("text/plain", "fig"), ("image/png", "iVBOR")]
        .into_iter()
        .collect();
    assert_eq!(select_representation(&both), Representation::Png("iVBOR"));

    let text: MimeBundle = [("text/plain", "hi")].into_iter().collect();
    assert_eq!(select_representation(&text), Representation::Text("hi"));

    assert_eq!(
        select_representation(&MimeBundle::new()),
        Representation::Unsupported
    );
}

// ============================================================================
// ANSI Tests
// ============================================================================

#[test]
fn test_ansi_reset_closes_all() {
    let html = ansi_to_html("\x1b[1m\x1b[31mBOLD-RED\x1b[0mplain");
    let (before, after) = html.split_once("BOLD-RED").unwrap();
    assert_eq!(before.matches("<span").count(), 2);

    let (closing, rest) = after.split_once("plain").unwrap();
    assert_eq!(closing, "</span></span>");
    assert_eq!(rest, "");
}

#[test]
fn test_ansi_strip_matches_converted_text() {
    let raw = "\x1b[1;31mError:\x1b[0m something \x1b[4mfailed\x1b[0m";
    assert_eq!(strip_ansi_str(raw), "Error: something failed");
    let html = ansi_to_html(raw);
    assert_eq!(
        sanitize_html(&html).replace("</span>", "").split('>').last(),
        Some("failed")
    );
}

// ============================================================================
// Sanitizer Tests
// ============================================================================

#[test]
fn test_sanitizer_allow_list() {
    let clean = sanitize_html(r#"<script>alert(1)</script><p onclick="x()">hi</p>"#);
    assert!(!clean.contains("<script"));
    assert!(!clean.contains("onclick"));
    assert!(clean.contains("<p>hi</p>"));
}

#[test]
fn test_sanitizer_idempotent() {
    let inputs = [
        r#"<div class="out"><table><tr><td colspan="2">1</td></tr></table></div>"#,
        r#"<a href=" javascript:alert(1)" title='t'>x</a><img src=x onerror=alert(1)>"#,
        "<scr<script>ipt>alert(1)</script>",
        "a < b > c <<p>> & d",
        "<p>unclosed <b>bold",
        r#"<IMG SRC="data:image/png;base64,AAAA" ALT="plot">"#,
        "<!-- <script>x</script> --><svg onload=alert(1)><p>t</p></svg>",
        r#"<span style="color:red" data-x="1">s</span>"#,
    ];
    for sanitizer in [
        HtmlSanitizer::default(),
        HtmlSanitizer::new(SanitizeOptions::strict()),
        HtmlSanitizer::new(SanitizeOptions::plain_text()),
    ] {
        for input in inputs {
            let once = sanitizer.sanitize(input);
            assert_eq!(sanitizer.sanitize(&once), once, "not idempotent for {input:?}");
        }
    }
}

#[test]
fn test_sanitizer_keeps_safe_image() {
    let clean = sanitize_html(r#"<img src="data:image/png;base64,AAAA" alt="plot" onerror="x()">"#);
    assert_eq!(clean, r#"<img src="data:image/png;base64,AAAA" alt="plot">"#);
}

// ============================================================================
// Tokenizer Tests
// ============================================================================

#[test]
fn test_tokenize_round_trip() {
    let sources = [
        "",
        "import numpy as np\n\n@decorator\ndef f(x: int) -> int:\n    return x ** 2  # square\n",
        "s = f'{x!r}' + \"\"\"multi\nline\"\"\" + 'esc\\'aped'\n",
        "broken = \"never closed\nnext = 1",
        "1e10 + .5 - 3.14j >= 0x_ff",
        "日本語 = '文字' # コメント",
        "\\\\\\",
    ];
    for source in sources {
        let joined: String = tokenize(source).iter().map(|t| t.text).collect();
        assert_eq!(joined, source);
    }
}

#[test]
fn test_highlight_html_is_safe() {
    let html = highlight_html("x = '<script>'", &Palette::dark());
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

// ============================================================================
// Loader Tests
// ============================================================================

#[tokio::test]
async fn test_load_and_render() {
    let mut file = Builder::new().suffix(".ipynb").tempfile().unwrap();
    let doc = json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": "**bold** <img src=x onerror=alert(1)>"},
            {"cell_type": "code", "metadata": {}, "source": "1 + 1", "execution_count": null, "outputs": [
                {"output_type": "execute_result", "execution_count": 1, "metadata": {},
                 "data": {"text/html": "<div onmouseover=\"x()\">2</div>", "text/plain": "2"}}
            ]}
        ]
    });
    file.write_all(doc.to_string().as_bytes()).unwrap();

    let notebook = load_notebook(file.path(), &LoadOptions::default())
        .await
        .unwrap();
    let html = Renderer::default().render_notebook(&notebook);

    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains(r#"<img src="x">"#));
    assert!(!html.contains("onerror"));
    assert!(!html.contains("onmouseover"));
    assert!(html.contains("In [ ]:"));
    assert!(html.contains(r#"<div class="output html"><div>2</div></div>"#));
}

#[tokio::test]
async fn test_load_errors() {
    let options = LoadOptions::default().timeout_ms(5_000);

    assert!(matches!(
        load_notebook("notes.txt", &options).await,
        Err(LoadError::InvalidExtension(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_notebook(dir.path().join("gone.ipynb"), &options).await,
        Err(LoadError::NotFound(_))
    ));

    let mut file = Builder::new().suffix(".ipynb").tempfile().unwrap();
    file.write_all(b"{\"nbformat\": 4").unwrap();
    assert!(matches!(
        load_notebook(file.path(), &options).await,
        Err(LoadError::Format {
            source: FormatError::InvalidJson(_),
            ..
        })
    ));
}
