use crate::config::Config;
use crate::error::SheetsError;
use crate::feed::{
    fetch_cells, list_worksheets, Credentials, Feed, FeedParams, ReqwestTransport, Transport,
    WorksheetCollection,
};

/// Entry point for fetching spreadsheet feeds.
///
/// Holds a [`Transport`] plus the settings that apply to every call. The
/// client keeps no per-call state, so one instance can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct SheetsClient<T = ReqwestTransport> {
    transport: T,
    feed_root: String,
    max_concurrent_worksheets: usize,
}

impl SheetsClient<ReqwestTransport> {
    /// Builds a client over `reqwest` using the timeouts and limits in `config`.
    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        let transport = ReqwestTransport::new(client)
            .with_timeout(config.request_timeout())
            .with_max_response_size(config.max_response_bytes);
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> SheetsClient<T> {
    /// Builds a client over any [`Transport`], taking the feed root and fan-out cap from `config`.
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            transport,
            feed_root: config.feed_root.clone(),
            max_concurrent_worksheets: config.max_concurrent_worksheets,
        }
    }

    /// The transport this client sends requests through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches one worksheet's cells feed.
    ///
    /// `params.worksheet` is required unless `params.url` is set.
    pub async fn get_cells(
        &self,
        params: &FeedParams,
        credentials: &Credentials,
    ) -> Result<Feed, SheetsError> {
        fetch_cells(&self.transport, &self.feed_root, params, credentials).await
    }

    /// Fetches the cells feed of every worksheet, in worksheet order.
    pub async fn get_worksheets(
        &self,
        params: &FeedParams,
        credentials: &Credentials,
    ) -> Result<WorksheetCollection, SheetsError> {
        list_worksheets(
            &self.transport,
            &self.feed_root,
            params,
            credentials,
            self.max_concurrent_worksheets,
        )
        .await
    }
}
