use super::fetcher::{Credentials, FeedRequest, Transport};
use super::flatten::{flatten_cells_feed, worksheet_entries};
use super::link::{find_link, LinkSchema};
use super::types::{Feed, WorksheetCollection};
use super::url::{build_url, resolve_url, FeedKind, FeedParams};
use crate::error::SheetsError;
use futures::stream::{self, StreamExt};

/// Fetches one worksheet's cells feed and flattens it.
///
/// Uses `params.url` when set, otherwise builds the cells URL under `root`.
pub async fn fetch_cells<T: Transport + ?Sized>(
    transport: &T,
    root: &str,
    params: &FeedParams,
    credentials: &Credentials,
) -> Result<Feed, SheetsError> {
    let url = resolve_url(root, FeedKind::Cells, params)?;
    let request = FeedRequest {
        url: &url,
        query: &params.query,
    };
    let doc = transport.request(&request, credentials).await?;
    Ok(flatten_cells_feed(&doc)?)
}

/// Fetches every worksheet of a spreadsheet as a flattened cells feed.
///
/// # Arguments
///
/// * `transport` - Performs the HTTP requests
/// * `root` - Feed service root used to build the worksheets URL
/// * `params` - Spreadsheet id, visibility, projection and query options
/// * `credentials` - Shared by every request of the call
/// * `max_concurrent` - Cap on in-flight worksheet requests, 0 for no cap
///
/// # Behavior
///
/// - The worksheets list URL is always built from `params`; `params.url` is
///   only honoured per worksheet, where it is replaced by the cells-feed link
/// - Every entry's cells-feed link is extracted before any worksheet request
///   is made, so a missing link fails the call without further traffic
/// - Worksheet requests run concurrently; the first error to complete is
///   returned and the remaining in-flight requests are dropped
/// - Results are returned in worksheet-list order, whatever order the
///   requests complete in
pub async fn list_worksheets<T: Transport + ?Sized>(
    transport: &T,
    root: &str,
    params: &FeedParams,
    credentials: &Credentials,
    max_concurrent: usize,
) -> Result<WorksheetCollection, SheetsError> {
    let list_url = build_url(root, FeedKind::Worksheets, params)?;
    let request = FeedRequest {
        url: &list_url,
        query: &params.query,
    };
    let doc = transport.request(&request, credentials).await?;

    let links = worksheet_entries(&doc)?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            find_link(entry, LinkSchema::CellsFeed)
                .map(str::to_owned)
                .ok_or(SheetsError::LinkNotFound {
                    index,
                    schema: LinkSchema::CellsFeed,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if links.is_empty() {
        return Ok(Vec::new());
    }

    let total = links.len();
    let limit = if max_concurrent == 0 {
        total
    } else {
        max_concurrent.min(total)
    };

    let mut branches = stream::iter(links.into_iter().enumerate())
        .map(|(index, link)| {
            let branch_params = params.clone().with_url(link);
            async move {
                let result = fetch_cells(transport, root, &branch_params, credentials).await;
                (index, result)
            }
        })
        .buffer_unordered(limit);

    // Slots are indexed by worksheet position, not completion order
    let mut slots: Vec<Option<Feed>> = vec![None; total];
    while let Some((index, result)) = branches.next().await {
        match result {
            Ok(feed) => slots[index] = Some(feed),
            Err(e) => {
                tracing::debug!(
                    id = %params.id,
                    worksheet = index,
                    error = %e,
                    "Worksheet fetch failed, abandoning remaining requests"
                );
                return Err(e);
            }
        }
    }

    tracing::info!(id = %params.id, worksheets = total, "Fetched all worksheets");
    Ok(slots.into_iter().flatten().collect())
}
