//! Discovery documents and the parser contract that produces them.
//!
//! Parsing the host-meta XRD, the WebFinger document and the hCard page is
//! delegated to a [`DocumentParser`]; this module only fixes the fields the
//! discovery session reads from each.

use crate::fetcher::BoxError;
use crate::handle::Handle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced by the handle in the WebFinger template.
pub const URI_PLACEHOLDER: &str = "{uri}";

/// The three documents fetched during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    HostMeta,
    WebFinger,
    HCard,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HostMeta => "host-meta",
            Self::WebFinger => "webfinger",
            Self::HCard => "hcard",
        })
    }
}

/// Parsed `/.well-known/host-meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMeta {
    /// LRDD template, e.g. `https://pod.example/webfinger?q={uri}`.
    pub webfinger_template_url: String,
}

impl HostMeta {
    /// Substitutes the handle for every `{uri}` in the template.
    pub fn webfinger_url(&self, handle: &Handle) -> String {
        self.webfinger_template_url
            .replace(URI_PLACEHOLDER, handle.as_str())
    }
}

/// Parsed WebFinger document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFinger {
    /// Subject the server answered for, usually `acct:local@domain`.
    pub acct_uri: String,
    pub guid: Option<String>,
    /// Profile (seed) URL of the account.
    pub seed_url: String,
    pub public_key: Option<String>,
    pub hcard_url: String,
}

/// Parsed hCard profile page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HCard {
    pub guid: Option<String>,
    pub public_key: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_large_url: Option<String>,
    pub photo_medium_url: Option<String>,
    pub photo_small_url: Option<String>,
    pub searchable: bool,
}

/// Turns fetched bodies into discovery documents.
pub trait DocumentParser: Send + Sync {
    /// Parses the host-meta XRD.
    fn parse_host_meta(&self, body: &str) -> Result<HostMeta, BoxError>;

    /// Parses the WebFinger document.
    fn parse_webfinger(&self, body: &str) -> Result<WebFinger, BoxError>;

    /// Parses the hCard HTML page.
    fn parse_hcard(&self, body: &str) -> Result<HCard, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_handle_into_template() {
        let host_meta = HostMeta {
            webfinger_template_url: "https://example.com/wf/{uri}".to_string(),
        };
        let handle = Handle::parse("user@example.com").unwrap();
        assert_eq!(
            host_meta.webfinger_url(&handle),
            "https://example.com/wf/user@example.com"
        );
    }

    #[test]
    fn substitutes_every_placeholder() {
        let host_meta = HostMeta {
            webfinger_template_url: "https://example.com/{uri}?q={uri}".to_string(),
        };
        let handle = Handle::parse("acct:User@Example.com").unwrap();
        assert_eq!(
            host_meta.webfinger_url(&handle),
            "https://example.com/user@example.com?q=user@example.com"
        );
    }

    #[test]
    fn document_kind_labels() {
        assert_eq!(DocumentKind::HostMeta.to_string(), "host-meta");
        assert_eq!(DocumentKind::WebFinger.to_string(), "webfinger");
        assert_eq!(DocumentKind::HCard.to_string(), "hcard");
    }
}
