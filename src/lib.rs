//! Client adapter for the Google Spreadsheets feed API.
//!
//! Builds worksheet and cells feed URLs, fetches them through a pluggable
//! [`feed::Transport`], and flattens the nested responses into plain
//! [`feed::Feed`] records.
//!
//! ```ignore
//! use sheetfeed::{Config, SheetsClient};
//! use sheetfeed::feed::FeedParams;
//!
//! let config = Config::default();
//! let client = SheetsClient::from_config(reqwest::Client::new(), &config);
//! let sheets = client
//!     .get_worksheets(&FeedParams::new("1a2b3c"), &config.credentials())
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;

pub use client::SheetsClient;
pub use config::{Config, ConfigError};
pub use error::SheetsError;
