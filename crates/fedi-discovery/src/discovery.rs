//! The discovery orchestrator.

use crate::config::{ConfigError, DiscoveryConfig};
use crate::documents::DocumentParser;
use crate::error::DiscoveryError;
use crate::fetcher::Fetcher;
use crate::handle::Handle;
use crate::http::HttpFetcher;
use crate::session::DiscoverySession;
use fedi_entities::{federation_schemas, Person, SchemaError, SchemaRegistry};
use std::sync::Arc;

/// Resolves handles into [`Person`] records.
///
/// Holds no per-resolution state; every call to [`resolve`](Self::resolve)
/// runs its own [`DiscoverySession`], so one instance can serve concurrent
/// resolutions.
pub struct Discovery<F, P> {
    fetcher: F,
    parser: P,
    schemas: Arc<SchemaRegistry>,
}

impl<F, P> Discovery<F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    /// Creates an orchestrator with the built-in `Person`/`Profile` schemas.
    pub fn new(fetcher: F, parser: P) -> Result<Self, SchemaError> {
        Ok(Self::with_schemas(
            fetcher,
            parser,
            Arc::new(federation_schemas()?),
        ))
    }

    /// Creates an orchestrator over an existing registry. The registry must
    /// contain the `Person` and `Profile` schemas.
    pub fn with_schemas(fetcher: F, parser: P, schemas: Arc<SchemaRegistry>) -> Self {
        Self {
            fetcher,
            parser,
            schemas,
        }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Starts a session for `raw_handle` without making any request.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidHandle` for a malformed handle.
    pub fn session(&self, raw_handle: &str) -> Result<DiscoverySession<'_, F, P>, DiscoveryError> {
        let handle = Handle::parse(raw_handle)?;
        Ok(DiscoverySession::new(
            &self.fetcher,
            &self.parser,
            &self.schemas,
            handle,
        ))
    }

    /// Resolves `raw_handle` into a complete account record.
    ///
    /// A handle that is not `local@domain` after normalization fails up front
    /// with `DiscoveryError::InvalidHandle` and makes no request, rather than
    /// surfacing later as a fetch failure against a bogus host.
    ///
    /// # Errors
    ///
    /// Any `DiscoveryError`; see [`DiscoverySession::fetch`].
    pub async fn resolve(&self, raw_handle: &str) -> Result<Person, DiscoveryError> {
        self.session(raw_handle)?.fetch().await
    }
}

impl<P> Discovery<HttpFetcher, P>
where
    P: DocumentParser,
{
    /// Creates an orchestrator that fetches over HTTP with `config.http`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the client cannot be built.
    pub fn from_config(config: &DiscoveryConfig, parser: P) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::new(fetcher, parser)?)
    }
}
