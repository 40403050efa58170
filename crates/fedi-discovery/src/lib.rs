//! Remote account discovery for federated social networks.
//!
//! Given a handle like `alice@pod.example`, [`Discovery::resolve`] fetches
//! three documents in order:
//!
//! 1. `https://pod.example/.well-known/host-meta`, falling back to plain HTTP
//!    once if the HTTPS request fails;
//! 2. the WebFinger document, from the host-meta template with `{uri}`
//!    replaced by the handle;
//! 3. the hCard profile page linked from WebFinger.
//!
//! The result is a validated [`Person`](fedi_entities::Person) record with its
//! embedded `Profile`. Any failure aborts the resolution.
//!
//! Transport and document parsing sit behind the [`Fetcher`] and
//! [`DocumentParser`] traits. [`HttpFetcher`] is the default transport.
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = fedi_discovery::load_config(Some("discovery.toml"))?;
//! fedi_discovery::init_tracing(&config.logging)?;
//!
//! let discovery = Discovery::from_config(&config, MyParser::default())?;
//! let person = discovery.resolve("acct:alice@pod.example").await?;
//! println!("{:?} {:?}", person.guid(), person.url());
//! ```

pub mod config;
mod discovery;
mod documents;
mod error;
mod fetcher;
mod handle;
mod http;
mod session;

pub use config::{init_tracing, load_config, ConfigError, DiscoveryConfig, HttpConfig, LoggingConfig};
pub use discovery::Discovery;
pub use documents::{DocumentKind, DocumentParser, HCard, HostMeta, WebFinger, URI_PLACEHOLDER};
pub use error::{DiscoveryError, FetchFailure};
pub use fetcher::{BoxError, Fetcher, Response};
pub use handle::{normalize, Handle};
pub use http::{BodyTooLarge, HttpFetcher};
pub use session::DiscoverySession;
