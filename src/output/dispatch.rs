//! MIME representation selection for rich outputs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::notebook::{MimeBundle, MimeData};
use crate::security::HtmlSanitizer;

/// MIME types the dispatcher understands, in preference order.
pub const PREFERENCE_ORDER: [&str; 6] = [
    "image/png",
    "image/jpeg",
    "image/svg+xml",
    "text/html",
    "application/json",
    "text/plain",
];

/// The representation chosen for a display/execute-result output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation<'a> {
    /// Base64-encoded PNG.
    Png(&'a str),
    /// Base64-encoded JPEG.
    Jpeg(&'a str),
    /// Literal SVG markup.
    Svg(&'a str),
    /// Untrusted HTML; sanitize before embedding.
    Html(&'a str),
    /// Pretty-printed JSON text.
    Json(String),
    /// Plain text, shown preformatted.
    Text(&'a str),
    /// No recognized MIME type present.
    Unsupported,
}

impl Representation<'_> {
    /// MIME type this representation came from.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Png(_) => Some("image/png"),
            Self::Jpeg(_) => Some("image/jpeg"),
            Self::Svg(_) => Some("image/svg+xml"),
            Self::Html(_) => Some("text/html"),
            Self::Json(_) => Some("application/json"),
            Self::Text(_) => Some("text/plain"),
            Self::Unsupported => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png(_) | Self::Jpeg(_) | Self::Svg(_))
    }

    /// `data:` URI for image representations.
    ///
    /// Raster payloads are already base64 and only lose embedded
    /// whitespace; SVG markup is base64-encoded here.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Self::Png(payload) | Self::Jpeg(payload) => {
                let mime = self.mime_type()?;
                let compact: String = payload
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                Some(format!("data:{mime};base64,{compact}"))
            }
            Self::Svg(markup) => Some(format!(
                "data:image/svg+xml;base64,{}",
                STANDARD.encode(markup.as_bytes())
            )),
            _ => None,
        }
    }

    /// Sanitized markup for HTML representations.
    pub fn sanitized_html(&self, sanitizer: &HtmlSanitizer) -> Option<String> {
        match self {
            Self::Html(html) => Some(sanitizer.sanitize(html)),
            _ => None,
        }
    }
}

/// Pick the representation to render from a MIME bundle.
///
/// The first MIME type in [`PREFERENCE_ORDER`] with a non-blank payload
/// wins. A bundle with none of them yields
/// [`Representation::Unsupported`]; this is a normal result, not an error.
pub fn select_representation(bundle: &MimeBundle) -> Representation<'_> {
    for mime in PREFERENCE_ORDER {
        let Some(data) = bundle.get(mime).filter(|data| !data.is_blank()) else {
            continue;
        };
        let selected = match (mime, data) {
            ("image/png", MimeData::Text(payload)) => Some(Representation::Png(payload)),
            ("image/jpeg", MimeData::Text(payload)) => Some(Representation::Jpeg(payload)),
            ("image/svg+xml", MimeData::Text(markup)) => Some(Representation::Svg(markup)),
            ("text/html", MimeData::Text(html)) => Some(Representation::Html(html)),
            ("application/json", data) => Some(Representation::Json(pretty_json(data))),
            ("text/plain", MimeData::Text(text)) => Some(Representation::Text(text)),
            _ => None,
        };
        if let Some(selected) = selected {
            return selected;
        }
    }
    Representation::Unsupported
}

/// Two-space indented JSON, keys in input order.
fn pretty_json(data: &MimeData) -> String {
    match data {
        MimeData::Json(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        MimeData::Text(text) => {
            serde_json::to_string_pretty(text).unwrap_or_else(|_| text.clone())
        }
    }
}
