//! Spreadsheet feed access: URL building, fetching, and flattening.
//!
//! - [`url`] - Canonical feed URLs and request parameters
//! - [`fetcher`] - The [`Transport`] seam and its `reqwest` implementation
//! - [`link`] - Schema-typed link lookup on worksheet entries
//! - [`flatten`] - Decoded feed tree to [`Feed`] records
//! - [`worksheets`] - Per-worksheet fan-out with ordered, fail-fast collection
//!
//! # Example
//!
//! ```ignore
//! use sheetfeed::feed::{list_worksheets, Credentials, FeedParams, ReqwestTransport, DEFAULT_FEED_ROOT};
//!
//! let transport = ReqwestTransport::new(reqwest::Client::new());
//! let params = FeedParams::new("1a2b3c");
//! let sheets = list_worksheets(&transport, DEFAULT_FEED_ROOT, &params, &Credentials::Anonymous, 0).await?;
//! ```

mod fetcher;
mod flatten;
mod link;
mod types;
mod url;
mod worksheets;

pub use fetcher::{Credentials, FeedRequest, FetchError, ReqwestTransport, Transport};
pub use flatten::{flatten_cells_feed, text_of, worksheet_entries, FlattenError};
pub use link::{find_link, LinkSchema};
pub use types::{Author, Cell, Feed, WorksheetCollection};
pub use url::{
    build_url, resolve_url, FeedKind, FeedParams, Projection, QueryOptions, UrlError, Visibility,
    DEFAULT_FEED_ROOT,
};
pub use worksheets::{fetch_cells, list_worksheets};
