use serde::{Deserialize, Serialize};

/// A single cell from a worksheet's cells feed.
///
/// All fields are passed through as the API reports them. `input_value` is
/// what the user typed (e.g. a formula), `value` is the rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Last-modified timestamp of the cell (RFC 3339 text, not parsed)
    pub updated: String,
    /// 1-based row number, as text
    pub row: String,
    /// 1-based column number, as text
    pub col: String,
    /// Raw input (formula or literal)
    pub input_value: String,
    /// Displayed value
    pub value: String,
}

/// Author of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// One worksheet's flattened cells feed.
///
/// `author` and `entry` keep the order of the source response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub updated: String,
    pub title: String,
    pub author: Vec<Author>,
    pub entry: Vec<Cell>,
}

/// Every worksheet of a spreadsheet, in the order the API listed them.
pub type WorksheetCollection = Vec<Feed>;
