//! Canonical notebook types.
//!
//! Every value here has already been through the validator: sources and
//! text payloads are single strings, metadata maps always exist, and the
//! cell/output kinds are closed enums. Fields are private so a canonical
//! notebook cannot be pushed back into a non-canonical shape.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// Open key-value metadata map, preserving unknown keys in input order.
pub type Metadata = serde_json::Map<String, Value>;

/// A validated nbformat v4+ notebook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notebook {
    #[serde(rename = "nbformat")]
    pub(crate) format_version: i64,
    #[serde(rename = "nbformat_minor")]
    pub(crate) format_minor: i64,
    pub(crate) metadata: Metadata,
    pub(crate) cells: Vec<Cell>,
}

impl Notebook {
    /// Major format version (always 4 or above).
    pub fn format_version(&self) -> i64 {
        self.format_version
    }

    /// Minor format version (0 when the input omitted it).
    pub fn format_minor(&self) -> i64 {
        self.format_minor
    }

    /// Notebook-level metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Cells in document order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Serialize back to canonical nbformat JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Kind of notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Executable code cell.
    Code,
    /// Markdown documentation cell.
    Markdown,
    /// Raw text cell, rendered verbatim.
    Raw,
}

impl CellType {
    /// The nbformat `cell_type` string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "markdown" => Ok(Self::Markdown),
            "raw" => Ok(Self::Raw),
            _ => Err(format!(
                "unknown cell type '{s}', expected: code, markdown, raw"
            )),
        }
    }
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Code(CodeCell),
    Markdown(TextCell),
    Raw(TextCell),
}

impl Cell {
    /// Which kind of cell this is.
    pub fn cell_type(&self) -> CellType {
        match self {
            Self::Code(_) => CellType::Code,
            Self::Markdown(_) => CellType::Markdown,
            Self::Raw(_) => CellType::Raw,
        }
    }

    /// Cell source as a single string.
    pub fn source(&self) -> &str {
        match self {
            Self::Code(cell) => &cell.source,
            Self::Markdown(cell) | Self::Raw(cell) => &cell.source,
        }
    }

    /// Cell metadata.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Code(cell) => &cell.metadata,
            Self::Markdown(cell) | Self::Raw(cell) => &cell.metadata,
        }
    }

    /// Cell id (nbformat 4.5+), if the input carried one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Code(cell) => cell.id.as_deref(),
            Self::Markdown(cell) | Self::Raw(cell) => cell.id.as_deref(),
        }
    }

    /// The code cell payload, if this is a code cell.
    pub fn as_code(&self) -> Option<&CodeCell> {
        match self {
            Self::Code(cell) => Some(cell),
            _ => None,
        }
    }
}

/// Payload of a code cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) metadata: Metadata,
    pub(crate) source: String,
    pub(crate) execution_count: Option<i64>,
    pub(crate) outputs: Vec<Output>,
}

impl CodeCell {
    /// Execution counter, absent for never-run cells.
    pub fn execution_count(&self) -> Option<i64> {
        self.execution_count
    }

    /// Outputs in the order they were produced.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }
}

/// Payload shared by markdown and raw cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    pub(crate) metadata: Metadata,
    pub(crate) source: String,
}

/// A code cell output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream(StreamOutput),
    DisplayData(DisplayData),
    ExecuteResult(ExecuteResult),
    Error(ErrorOutput),
}

impl Output {
    /// The nbformat `output_type` string.
    pub fn output_type(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::DisplayData(_) => "display_data",
            Self::ExecuteResult(_) => "execute_result",
            Self::Error(_) => "error",
        }
    }

    /// The MIME bundle for rich outputs; `None` for stream and error outputs.
    pub fn mime_bundle(&self) -> Option<&MimeBundle> {
        match self {
            Self::DisplayData(output) => Some(&output.data),
            Self::ExecuteResult(output) => Some(&output.data),
            Self::Stream(_) | Self::Error(_) => None,
        }
    }
}

/// Which standard stream produced a stream output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamName {
    Stdout,
    Stderr,
}

impl StreamName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured stdout/stderr text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamOutput {
    pub(crate) name: StreamName,
    pub(crate) text: String,
}

impl StreamOutput {
    pub fn name(&self) -> StreamName {
        self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Rich display output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayData {
    pub(crate) data: MimeBundle,
    pub(crate) metadata: Metadata,
}

impl DisplayData {
    pub fn data(&self) -> &MimeBundle {
        &self.data
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Value of the last expression in a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteResult {
    pub(crate) execution_count: Option<i64>,
    pub(crate) data: MimeBundle,
    pub(crate) metadata: Metadata,
}

impl ExecuteResult {
    pub fn execution_count(&self) -> Option<i64> {
        self.execution_count
    }

    pub fn data(&self) -> &MimeBundle {
        &self.data
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// An exception raised while executing a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorOutput {
    pub(crate) ename: String,
    pub(crate) evalue: String,
    pub(crate) traceback: Vec<String>,
}

impl ErrorOutput {
    /// Exception class name.
    pub fn name(&self) -> &str {
        &self.ename
    }

    /// Exception message.
    pub fn value(&self) -> &str {
        &self.evalue
    }

    /// Traceback lines, usually carrying ANSI color codes.
    pub fn traceback(&self) -> &[String] {
        &self.traceback
    }
}

/// One representation inside a MIME bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MimeData {
    /// Textual payload, fragments already joined.
    Text(String),
    /// Structured payload (`application/json` and friends).
    Json(Value),
}

impl MimeData {
    /// The payload as text, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// An empty string or JSON `null` carries nothing to render.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Json(value) => value.is_null(),
        }
    }
}

impl From<&str> for MimeData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for MimeData {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Map from MIME type to payload, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MimeBundle {
    entries: IndexMap<String, MimeData>,
}

impl MimeBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the payload for a MIME type.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, mime: impl Into<String>, data: impl Into<MimeData>) {
        self.entries.insert(mime.into(), data.into());
    }

    /// Payload for a MIME type.
    pub fn get(&self, mime: &str) -> Option<&MimeData> {
        self.entries.get(mime)
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.entries.contains_key(mime)
    }

    /// MIME types in input order.
    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MimeData)> {
        self.entries.iter().map(|(key, data)| (key.as_str(), data))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<MimeData>> FromIterator<(K, V)> for MimeBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(mime, data)| (mime.into(), data.into()))
                .collect(),
        }
    }
}

impl Serialize for MimeBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (mime, data) in &self.entries {
            map.serialize_entry(mime, data)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_type_round_trip() {
        for ty in [CellType::Code, CellType::Markdown, CellType::Raw] {
            assert_eq!(ty.as_str().parse::<CellType>().unwrap(), ty);
        }
        assert!("unknown".parse::<CellType>().is_err());
        assert!("Code".parse::<CellType>().is_err());
    }

    #[test]
    fn test_mime_bundle_insert_replaces() {
        let mut bundle = MimeBundle::new();
        bundle.insert("text/plain", "a");
        bundle.insert("text/html", "<b>b</b>");
        bundle.insert("text/plain", "c");

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("text/plain").and_then(MimeData::as_text), Some("c"));
        assert_eq!(
            bundle.mime_types().collect::<Vec<_>>(),
            vec!["text/plain", "text/html"]
        );
    }

    #[test]
    fn test_mime_data_blank() {
        assert!(MimeData::from("").is_blank());
        assert!(MimeData::Json(Value::Null).is_blank());
        assert!(!MimeData::from("x").is_blank());
        assert!(!MimeData::Json(json!({})).is_blank());
    }

    #[test]
    fn test_cell_serializes_with_tag() {
        let cell = Cell::Markdown(TextCell {
            id: None,
            metadata: Metadata::new(),
            source: "# Title".into(),
        });
        let value = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            value,
            json!({"cell_type": "markdown", "metadata": {}, "source": "# Title"})
        );
    }

    #[test]
    fn test_output_serializes_with_tag() {
        let output = Output::Stream(StreamOutput {
            name: StreamName::Stderr,
            text: "oops\n".into(),
        });
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({"output_type": "stream", "name": "stderr", "text": "oops\n"})
        );
    }

    #[test]
    fn test_mime_bundle_serializes_in_order() {
        let bundle: MimeBundle = [
            ("text/plain", MimeData::from("1")),
            ("application/json", MimeData::Json(json!({"b": 1, "a": 2}))),
        ]
        .into_iter()
        .collect();
        let text = serde_json::to_string(&bundle).unwrap();
        assert_eq!(text, r#"{"text/plain":"1","application/json":{"b":1,"a":2}}"#);
    }
}
