//! Flattening of decoded feed documents into [`Feed`] records.
//!
//! The API wraps most text in `{"$t": "..."}` objects and nests cell data
//! under `gs$cell`. Everything here walks a `serde_json::Value` tree and
//! reports the dotted path of the first field that is absent or has the
//! wrong shape, e.g. `feed.entry[3].gs$cell.row`.

use super::types::{Author, Cell, Feed};
use serde_json::Value;
use thiserror::Error;

/// Errors raised when a decoded response does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// A required field is absent
    #[error("Malformed response: missing field '{path}'")]
    MissingField { path: String },
    /// A field is present but is not of the expected JSON type
    #[error("Malformed response: field '{path}' is not {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },
}

/// Reads the text content (`$t`) of a wrapper node.
///
/// `path` locates `node` in the document and is only used for errors.
pub fn text_of(node: &Value, path: &str) -> Result<String, FlattenError> {
    let inner = field(node, "$t", path)?;
    string(inner, &format!("{path}.$t"))
}

/// Flattens a decoded cells feed into a [`Feed`].
///
/// The feed service leaves `entry` out entirely when a worksheet has no
/// cells, so an absent `entry` yields an empty cell list. Every other field,
/// `author` included, is required and reported as a [`FlattenError`] when
/// missing.
pub fn flatten_cells_feed(doc: &Value) -> Result<Feed, FlattenError> {
    let feed = field(doc, "feed", "")?;

    let updated = text_of(field(feed, "updated", "feed")?, "feed.updated")?;
    let title = text_of(field(feed, "title", "feed")?, "feed.title")?;

    let author = required_array(feed, "author", "feed")?
        .iter()
        .enumerate()
        .map(|(i, node)| flatten_author(node, &format!("feed.author[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let entry = optional_array(feed, "entry", "feed")?
        .iter()
        .enumerate()
        .map(|(i, node)| flatten_cell(node, &format!("feed.entry[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Feed {
        updated,
        title,
        author,
        entry,
    })
}

/// Returns the raw `feed.entry` list of a worksheets feed.
///
/// Entries are left undecoded so callers can pull links out of them.
pub fn worksheet_entries(doc: &Value) -> Result<&[Value], FlattenError> {
    let feed = field(doc, "feed", "")?;
    optional_array(feed, "entry", "feed")
}

fn flatten_author(node: &Value, path: &str) -> Result<Author, FlattenError> {
    Ok(Author {
        name: text_of(field(node, "name", path)?, &format!("{path}.name"))?,
        email: text_of(field(node, "email", path)?, &format!("{path}.email"))?,
    })
}

fn flatten_cell(node: &Value, path: &str) -> Result<Cell, FlattenError> {
    let updated = text_of(field(node, "updated", path)?, &format!("{path}.updated"))?;

    let cell_path = format!("{path}.gs$cell");
    let cell = field(node, "gs$cell", path)?;

    Ok(Cell {
        updated,
        row: index(field(cell, "row", &cell_path)?, &format!("{cell_path}.row"))?,
        col: index(field(cell, "col", &cell_path)?, &format!("{cell_path}.col"))?,
        input_value: string(
            field(cell, "inputValue", &cell_path)?,
            &format!("{cell_path}.inputValue"),
        )?,
        value: text_of(cell, &cell_path)?,
    })
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

fn field<'a>(node: &'a Value, key: &str, parent: &str) -> Result<&'a Value, FlattenError> {
    if !node.is_object() {
        return Err(FlattenError::WrongType {
            path: if parent.is_empty() {
                "<root>".to_owned()
            } else {
                parent.to_owned()
            },
            expected: "an object",
        });
    }
    node.get(key).ok_or_else(|| FlattenError::MissingField {
        path: join(parent, key),
    })
}

fn required_array<'a>(
    node: &'a Value,
    key: &str,
    parent: &str,
) -> Result<&'a [Value], FlattenError> {
    match field(node, key, parent)? {
        Value::Array(items) => Ok(items.as_slice()),
        _ => Err(FlattenError::WrongType {
            path: join(parent, key),
            expected: "an array",
        }),
    }
}

/// Absent key reads as an empty list; present but non-array is malformed.
/// Only used for `entry`, which the service omits for empty feeds.
fn optional_array<'a>(
    node: &'a Value,
    key: &str,
    parent: &str,
) -> Result<&'a [Value], FlattenError> {
    match node.get(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(FlattenError::WrongType {
            path: join(parent, key),
            expected: "an array",
        }),
    }
}

fn string(value: &Value, path: &str) -> Result<String, FlattenError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(FlattenError::WrongType {
            path: path.to_owned(),
            expected: "a string",
        }),
    }
}

/// Row and column numbers arrive as text or as JSON numbers.
fn index(value: &Value, path: &str) -> Result<String, FlattenError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(FlattenError::WrongType {
            path: path.to_owned(),
            expected: "a string or number",
        }),
    }
}
