use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Root of the spreadsheets feed service.
pub const DEFAULT_FEED_ROOT: &str = "https://spreadsheets.google.com/feeds";

/// Errors raised while building a feed URL from request parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// The spreadsheet id was empty
    #[error("Missing spreadsheet id")]
    MissingId,
    /// A cells feed was requested without naming the worksheet
    #[error("Missing worksheet for cells feed of spreadsheet '{0}'")]
    MissingWorksheet(String),
    /// Visibility or projection text was not one of the known values
    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

/// Which feed of a spreadsheet to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Cells,
    Worksheets,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Cells => "cells",
            FeedKind::Worksheets => "worksheets",
        }
    }
}

/// Access level of a feed. Private feeds require credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(UrlError::UnknownValue {
                kind: "visibility",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much metadata the API returns per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Full,
    Basic,
}

impl Projection {
    pub fn as_str(self) -> &'static str {
        match self {
            Projection::Full => "full",
            Projection::Basic => "basic",
        }
    }
}

impl FromStr for Projection {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Projection::Full),
            "basic" => Ok(Projection::Basic),
            other => Err(UrlError::UnknownValue {
                kind: "projection",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-string filters understood by the feed API.
///
/// These are forwarded to the transport untouched; nothing here checks that
/// `min_row <= max_row` or that `sq` is a valid structured query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub min_row: Option<u32>,
    pub max_row: Option<u32>,
    pub min_col: Option<u32>,
    pub max_col: Option<u32>,
    /// Column to sort by
    pub orderby: Option<String>,
    pub reverse: Option<bool>,
    /// Structured query to filter rows
    pub sq: Option<String>,
    /// Response format
    pub alt: Option<String>,
}

impl QueryOptions {
    /// Returns the set options as `(name, value)` pairs using the API's
    /// hyphenated parameter names, in a fixed order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let numeric = [
            ("min-row", self.min_row),
            ("max-row", self.max_row),
            ("min-col", self.min_col),
            ("max-col", self.max_col),
        ];
        for (name, value) in numeric {
            if let Some(v) = value {
                pairs.push((name, v.to_string()));
            }
        }
        if let Some(orderby) = &self.orderby {
            pairs.push(("orderby", orderby.clone()));
        }
        if let Some(reverse) = self.reverse {
            pairs.push(("reverse", reverse.to_string()));
        }
        if let Some(sq) = &self.sq {
            pairs.push(("sq", sq.clone()));
        }
        if let Some(alt) = &self.alt {
            pairs.push(("alt", alt.clone()));
        }
        pairs
    }
}

/// Parameters for a single feed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParams {
    /// Spreadsheet key
    pub id: String,
    /// Worksheet id within the spreadsheet (required for cells feeds)
    pub worksheet: Option<String>,
    pub visibility: Option<Visibility>,
    pub projection: Option<Projection>,
    /// Fully-built feed URL. When set, URL building is skipped.
    pub url: Option<String>,
    pub query: QueryOptions,
}

impl FeedParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn query(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }
}

/// Builds the canonical feed URL for `kind`, ignoring any `params.url`.
///
/// Segments are `root/{kind}/{id}[/{worksheet}]/{visibility}/{projection}`,
/// with visibility defaulting to `public` and projection to `full`.
///
/// # Errors
///
/// - [`UrlError::MissingId`] if `params.id` is empty
/// - [`UrlError::MissingWorksheet`] for a cells feed without a worksheet
pub fn build_url(root: &str, kind: FeedKind, params: &FeedParams) -> Result<String, UrlError> {
    if params.id.is_empty() {
        return Err(UrlError::MissingId);
    }

    let mut segments = vec![root.trim_end_matches('/'), kind.as_str(), params.id.as_str()];

    if kind == FeedKind::Cells {
        match params.worksheet.as_deref() {
            Some(ws) if !ws.is_empty() => segments.push(ws),
            _ => return Err(UrlError::MissingWorksheet(params.id.clone())),
        }
    }

    segments.push(params.visibility.unwrap_or_default().as_str());
    segments.push(params.projection.unwrap_or_default().as_str());

    Ok(segments.join("/"))
}

/// Returns `params.url` when set, otherwise the built URL for `kind`.
pub fn resolve_url(root: &str, kind: FeedKind, params: &FeedParams) -> Result<String, UrlError> {
    match &params.url {
        Some(url) => Ok(url.clone()),
        None => build_url(root, kind, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_worksheets_url_defaults() {
        let params = FeedParams::new("abc123");
        let url = build_url(DEFAULT_FEED_ROOT, FeedKind::Worksheets, &params).unwrap();
        assert_eq!(
            url,
            "https://spreadsheets.google.com/feeds/worksheets/abc123/public/full"
        );
    }

    #[test]
    fn test_cells_url_explicit_visibility_and_projection() {
        let params = FeedParams::new("abc123")
            .worksheet("od6")
            .visibility(Visibility::Private)
            .projection(Projection::Basic);
        let url = build_url(DEFAULT_FEED_ROOT, FeedKind::Cells, &params).unwrap();
        assert_eq!(
            url,
            "https://spreadsheets.google.com/feeds/cells/abc123/od6/private/basic"
        );
    }

    #[test]
    fn test_cells_url_without_worksheet_is_rejected() {
        let params = FeedParams::new("abc123");
        let err = build_url(DEFAULT_FEED_ROOT, FeedKind::Cells, &params).unwrap_err();
        assert_eq!(err, UrlError::MissingWorksheet("abc123".into()));
    }

    #[test]
    fn test_cells_url_with_empty_worksheet_is_rejected() {
        let params = FeedParams::new("abc123").worksheet("");
        let result = build_url(DEFAULT_FEED_ROOT, FeedKind::Cells, &params);
        assert!(matches!(result, Err(UrlError::MissingWorksheet(_))));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let params = FeedParams::new("");
        let result = build_url(DEFAULT_FEED_ROOT, FeedKind::Worksheets, &params);
        assert_eq!(result, Err(UrlError::MissingId));
    }

    #[test]
    fn test_worksheet_ignored_for_worksheets_feed() {
        let params = FeedParams::new("abc").worksheet("od6");
        let url = build_url(DEFAULT_FEED_ROOT, FeedKind::Worksheets, &params).unwrap();
        assert!(!url.contains("od6"));
    }

    #[test]
    fn test_trailing_slash_on_root_is_trimmed() {
        let params = FeedParams::new("abc");
        let url = build_url("http://127.0.0.1:9000/feeds/", FeedKind::Worksheets, &params).unwrap();
        assert_eq!(url, "http://127.0.0.1:9000/feeds/worksheets/abc/public/full");
    }

    #[test]
    fn test_explicit_url_overrides_builder() {
        // Override wins even when the params could not build a URL themselves
        let params = FeedParams::default().with_url("https://example.com/custom");
        let url = resolve_url(DEFAULT_FEED_ROOT, FeedKind::Cells, &params).unwrap();
        assert_eq!(url, "https://example.com/custom");
    }

    #[test]
    fn test_visibility_and_projection_parse() {
        assert_eq!("private".parse::<Visibility>(), Ok(Visibility::Private));
        assert_eq!("basic".parse::<Projection>(), Ok(Projection::Basic));
        assert!("secret".parse::<Visibility>().is_err());
        assert!("thin".parse::<Projection>().is_err());
    }

    #[test]
    fn test_query_pairs_use_api_names() {
        let query = QueryOptions {
            min_row: Some(2),
            max_col: Some(4),
            orderby: Some("column:name".into()),
            reverse: Some(true),
            sq: Some("age > 25".into()),
            ..QueryOptions::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("min-row", "2".to_string()),
                ("max-col", "4".to_string()),
                ("orderby", "column:name".to_string()),
                ("reverse", "true".to_string()),
                ("sq", "age > 25".to_string()),
            ]
        );
        assert!(QueryOptions::default().to_pairs().is_empty());
    }

    fn visibility_strategy() -> impl Strategy<Value = Option<Visibility>> {
        prop_oneof![
            Just(None),
            Just(Some(Visibility::Public)),
            Just(Some(Visibility::Private)),
        ]
    }

    fn projection_strategy() -> impl Strategy<Value = Option<Projection>> {
        prop_oneof![
            Just(None),
            Just(Some(Projection::Full)),
            Just(Some(Projection::Basic)),
        ]
    }

    proptest! {
        #[test]
        fn prop_worksheets_url_shape(
            id in "[A-Za-z0-9_-]{1,44}",
            visibility in visibility_strategy(),
            projection in projection_strategy(),
        ) {
            let params = FeedParams {
                id: id.clone(),
                visibility,
                projection,
                ..FeedParams::default()
            };
            let url = build_url(DEFAULT_FEED_ROOT, FeedKind::Worksheets, &params).unwrap();
            let expected = format!(
                "{}/worksheets/{}/{}/{}",
                DEFAULT_FEED_ROOT,
                id,
                visibility.map_or("public", Visibility::as_str),
                projection.map_or("full", Projection::as_str),
            );
            prop_assert_eq!(url, expected);
        }

        #[test]
        fn prop_cells_url_shape(
            id in "[A-Za-z0-9_-]{1,44}",
            worksheet in "[a-z0-9]{1,8}",
            visibility in visibility_strategy(),
            projection in projection_strategy(),
        ) {
            let params = FeedParams {
                id: id.clone(),
                worksheet: Some(worksheet.clone()),
                visibility,
                projection,
                ..FeedParams::default()
            };
            let url = build_url(DEFAULT_FEED_ROOT, FeedKind::Cells, &params).unwrap();
            let expected = format!(
                "{}/cells/{}/{}/{}/{}",
                DEFAULT_FEED_ROOT,
                id,
                worksheet,
                visibility.map_or("public", Visibility::as_str),
                projection.map_or("full", Projection::as_str),
            );
            prop_assert_eq!(url, expected);
        }
    }
}
