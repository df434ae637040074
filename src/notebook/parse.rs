//! Notebook validation and normalization.
//!
//! The validator reads raw nbformat JSON and builds a fresh canonical
//! [`Notebook`]. The input value is never modified.

use serde_json::{Map, Value};

use super::model::{
    Cell, CodeCell, DisplayData, ErrorOutput, ExecuteResult, Metadata, MimeBundle, MimeData,
    Notebook, Output, StreamName, StreamOutput, TextCell,
};
use crate::error::FormatError;

/// Lowest supported `nbformat` major version.
pub const MIN_FORMAT_VERSION: f64 = 4.0;

/// Raw notebook input: JSON text or an already parsed JSON value.
#[derive(Debug, Clone, Copy)]
pub enum NotebookInput<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for NotebookInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for NotebookInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a Value> for NotebookInput<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Value(value)
    }
}

/// Parse and validate a notebook.
///
/// # Errors
///
/// Returns [`FormatError`] if the input is not valid JSON, is not an
/// object, has a missing or pre-v4 `nbformat`, has no `cells` array, or
/// contains a cell or output of an unrecognized type.
pub fn parse<'a>(input: impl Into<NotebookInput<'a>>) -> Result<Notebook, FormatError> {
    match input.into() {
        NotebookInput::Text(text) => {
            let value: Value = serde_json::from_str(text)?;
            validate(&value)
        }
        NotebookInput::Value(value) => validate(value),
    }
}

/// Check whether `input` would parse, without surfacing the error.
pub fn is_valid<'a>(input: impl Into<NotebookInput<'a>>) -> bool {
    parse(input).is_ok()
}

fn validate(value: &Value) -> Result<Notebook, FormatError> {
    let root = value.as_object().ok_or(FormatError::NotAnObject)?;

    let version = root
        .get("nbformat")
        .and_then(Value::as_f64)
        .ok_or(FormatError::MissingVersion)?;
    if version < MIN_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    let raw_cells = root
        .get("cells")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingCells)?;

    let cells = raw_cells
        .iter()
        .enumerate()
        .map(|(index, cell)| parse_cell(index, cell))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Notebook {
        format_version: version as i64,
        format_minor: root
            .get("nbformat_minor")
            .and_then(as_integer)
            .unwrap_or(0),
        metadata: metadata_of(root),
        cells,
    })
}

fn parse_cell(index: usize, value: &Value) -> Result<Cell, FormatError> {
    let cell = value
        .as_object()
        .ok_or(FormatError::CellNotAnObject { index })?;

    let id = cell.get("id").and_then(Value::as_str).map(str::to_owned);
    let metadata = metadata_of(cell);
    let source = join_text(cell.get("source"));

    match cell.get("cell_type").and_then(Value::as_str) {
        Some("code") => {
            let outputs = match cell.get("outputs").and_then(Value::as_array) {
                Some(outputs) => outputs
                    .iter()
                    .enumerate()
                    .map(|(output, value)| parse_output(index, output, value))
                    .collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(Cell::Code(CodeCell {
                id,
                metadata,
                source,
                execution_count: cell.get("execution_count").and_then(as_integer),
                outputs,
            }))
        }
        Some("markdown") => Ok(Cell::Markdown(TextCell {
            id,
            metadata,
            source,
        })),
        Some("raw") => Ok(Cell::Raw(TextCell {
            id,
            metadata,
            source,
        })),
        _ => Err(FormatError::InvalidCellType {
            index,
            found: describe(cell.get("cell_type")),
        }),
    }
}

fn parse_output(cell: usize, index: usize, value: &Value) -> Result<Output, FormatError> {
    let output = value.as_object().ok_or(FormatError::OutputNotAnObject {
        cell,
        output: index,
    })?;

    match output.get("output_type").and_then(Value::as_str) {
        Some("stream") => {
            let name = match output.get("name").and_then(Value::as_str) {
                Some("stderr") => StreamName::Stderr,
                _ => StreamName::Stdout,
            };
            Ok(Output::Stream(StreamOutput {
                name,
                text: join_text(output.get("text")),
            }))
        }
        Some("display_data") => Ok(Output::DisplayData(DisplayData {
            data: mime_bundle(output.get("data")),
            metadata: metadata_of(output),
        })),
        Some("execute_result") => Ok(Output::ExecuteResult(ExecuteResult {
            execution_count: output.get("execution_count").and_then(as_integer),
            data: mime_bundle(output.get("data")),
            metadata: metadata_of(output),
        })),
        Some("error") => {
            let traceback = output
                .get("traceback")
                .and_then(Value::as_array)
                .map(|lines| lines.iter().map(fragment_text).collect())
                .unwrap_or_default();
            Ok(Output::Error(ErrorOutput {
                ename: join_text(output.get("ename")),
                evalue: join_text(output.get("evalue")),
                traceback,
            }))
        }
        _ => Err(FormatError::InvalidOutputType {
            cell,
            output: index,
            found: describe(output.get("output_type")),
        }),
    }
}

/// Metadata map of a JSON object, or an empty map when missing or not an object.
fn metadata_of(object: &Map<String, Value>) -> Metadata {
    object
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Join a multiline string field into one string.
///
/// Arrays are concatenated with no separator; `null`/missing becomes the
/// empty string; other scalars become their JSON text.
fn join_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(fragments)) => fragments.iter().map(fragment_text).collect(),
        Some(other) => other.to_string(),
    }
}

fn fragment_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn mime_bundle(value: Option<&Value>) -> MimeBundle {
    let Some(data) = value.and_then(Value::as_object) else {
        return MimeBundle::new();
    };

    data.iter()
        .map(|(mime, payload)| (mime.clone(), mime_data(mime, payload)))
        .collect()
}

fn mime_data(mime: &str, payload: &Value) -> MimeData {
    if is_json_mime(mime) {
        return MimeData::Json(payload.clone());
    }
    match payload {
        Value::String(text) => MimeData::Text(text.clone()),
        Value::Array(fragments) if fragments.iter().all(Value::is_string) => {
            MimeData::Text(fragments.iter().filter_map(Value::as_str).collect())
        }
        other => MimeData::Json(other.clone()),
    }
}

fn is_json_mime(mime: &str) -> bool {
    mime == "application/json" || mime.ends_with("+json")
}

/// Integer value of a JSON number; whole floats are accepted.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|float| float.fract() == 0.0)
            .map(|float| float as i64)
    })
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "missing".to_string(),
    }
}
