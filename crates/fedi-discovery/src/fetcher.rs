//! The HTTP transport contract.

use std::future::Future;
use std::sync::Arc;

/// Boxed error used at the transport and parser seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests for the discovery session.
///
/// Timeouts, redirects and TLS belong to the implementation. A request that
/// completes with any status is `Ok`; only transport failures are `Err`.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, BoxError>> + Send;
}

impl<T: Fetcher> Fetcher for &T {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, BoxError>> + Send {
        (**self).get(url)
    }
}

impl<T: Fetcher> Fetcher for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, BoxError>> + Send {
        (**self).get(url)
    }
}
