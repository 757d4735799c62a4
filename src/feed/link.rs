use serde_json::Value;
use std::fmt;

/// Relation types of the links attached to a worksheet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSchema {
    /// Row-oriented list feed
    ListFeed,
    /// Cell-oriented cells feed
    CellsFeed,
    /// Visualization API endpoint
    Visualization,
    /// CSV export
    ExportCsv,
}

impl LinkSchema {
    pub const ALL: [LinkSchema; 4] = [
        LinkSchema::ListFeed,
        LinkSchema::CellsFeed,
        LinkSchema::Visualization,
        LinkSchema::ExportCsv,
    ];

    /// The `rel` URI the API uses for this link type.
    pub fn rel(self) -> &'static str {
        match self {
            LinkSchema::ListFeed => "http://schemas.google.com/spreadsheets/2006#listfeed",
            LinkSchema::CellsFeed => "http://schemas.google.com/spreadsheets/2006#cellsfeed",
            LinkSchema::Visualization => {
                "http://schemas.google.com/visualization/2008#visualizationApi"
            }
            LinkSchema::ExportCsv => "http://schemas.google.com/spreadsheets/2006#exportcsv",
        }
    }
}

impl fmt::Display for LinkSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rel())
    }
}

/// Returns the `href` of the first link on `entry` whose `rel` is `schema`.
///
/// `None` when the entry has no `link` array or no link of that type.
/// Links missing an `href` string are skipped.
pub fn find_link(entry: &Value, schema: LinkSchema) -> Option<&str> {
    entry
        .get("link")?
        .as_array()?
        .iter()
        .filter(|link| link.get("rel").and_then(Value::as_str) == Some(schema.rel()))
        .find_map(|link| link.get("href").and_then(Value::as_str))
}
