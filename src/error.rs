use crate::feed::{FetchError, FlattenError, LinkSchema, UrlError};
use thiserror::Error;

/// Errors returned by the public feed operations.
///
/// Each call yields at most one of these; there are no partial results.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Request parameters could not produce a feed URL
    #[error(transparent)]
    Url(#[from] UrlError),
    /// The transport failed (network, timeout, status, size, decoding)
    #[error(transparent)]
    Transport(#[from] FetchError),
    /// The decoded response was missing an expected field
    #[error(transparent)]
    Malformed(#[from] FlattenError),
    /// A worksheet entry had no link of the requested type
    #[error("Worksheet entry {index} has no '{schema}' link")]
    LinkNotFound { index: usize, schema: LinkSchema },
}
