//! Error types for account discovery.

use crate::documents::DocumentKind;
use crate::fetcher::BoxError;
use fedi_entities::SchemaError;

/// Why a single fetch failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    /// The transport could not complete the request (connection, TLS,
    /// timeout, oversized body).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Errors that can occur while resolving a handle.
///
/// Resolution is all-or-nothing: any of these aborts the session and no
/// partial record is returned.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The handle is not of the form `local@domain` after normalization.
    #[error("invalid handle: {handle:?}")]
    InvalidHandle { handle: String },

    /// A document could not be fetched.
    #[error("failed to fetch {url} for {handle}: {cause}")]
    Fetch {
        url: String,
        handle: String,
        #[source]
        cause: FetchFailure,
    },

    /// A fetched document could not be parsed.
    #[error("failed to parse {document} from {url} for {handle}: {cause}")]
    Parse {
        document: DocumentKind,
        url: String,
        handle: String,
        #[source]
        cause: BoxError,
    },

    /// WebFinger answered for a different account than requested.
    #[error("handle does not match: wanted {expected} but got {actual}")]
    HandleMismatch { expected: String, actual: String },

    /// The documents did not yield a complete identity record.
    #[error("incomplete identity record for {handle}: {cause}")]
    IncompleteRecord {
        handle: String,
        #[source]
        cause: SchemaError,
    },
}

impl DiscoveryError {
    /// The URL whose fetch or parse failed, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Fetch { url, .. } | Self::Parse { url, .. } => Some(url),
            _ => None,
        }
    }
}
