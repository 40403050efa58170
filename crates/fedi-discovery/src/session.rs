//! One resolution of a handle into a [`Person`].

use crate::documents::{DocumentKind, DocumentParser, HCard, HostMeta, WebFinger};
use crate::error::{DiscoveryError, FetchFailure};
use crate::fetcher::{BoxError, Fetcher};
use crate::handle::{normalize, Handle};
use fedi_entities::{Person, SchemaError, SchemaRegistry, PERSON};
use serde_json::json;

/// Per-resolution state.
///
/// Host-meta starts on HTTPS and may fall back to HTTP once. The WebFinger
/// and hCard documents are fetched lazily and at most once. A session is
/// single-use: [`fetch`](Self::fetch) consumes it.
pub struct DiscoverySession<'a, F, P> {
    fetcher: &'a F,
    parser: &'a P,
    schemas: &'a SchemaRegistry,
    handle: Handle,
    ssl: bool,
    webfinger: Option<WebFinger>,
    hcard: Option<HCard>,
}

impl<'a, F, P> DiscoverySession<'a, F, P>
where
    F: Fetcher,
    P: DocumentParser,
{
    pub(crate) fn new(
        fetcher: &'a F,
        parser: &'a P,
        schemas: &'a SchemaRegistry,
        handle: Handle,
    ) -> Self {
        Self {
            fetcher,
            parser,
            schemas,
            handle,
            ssl: true,
            webfinger: None,
            hcard: None,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Whether host-meta is still requested over HTTPS.
    pub fn ssl(&self) -> bool {
        self.ssl
    }

    /// The WebFinger document, fetching host-meta and WebFinger on first use.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` or `Parse` for whichever document failed, or
    /// `HandleMismatch` if the document answers for another account. A failed
    /// call memoizes nothing, so only a verified document is ever returned.
    pub async fn webfinger(&mut self) -> Result<&WebFinger, DiscoveryError> {
        let webfinger = match self.webfinger.take() {
            Some(webfinger) => webfinger,
            None => self.fetch_webfinger().await?,
        };
        Ok(self.webfinger.insert(webfinger))
    }

    /// The hCard document, fetched from the WebFinger `hcard_url` on first use.
    ///
    /// # Errors
    ///
    /// Same as [`webfinger`](Self::webfinger), plus failures of the hCard
    /// request itself. On `HandleMismatch` the hCard is never requested.
    pub async fn hcard(&mut self) -> Result<&HCard, DiscoveryError> {
        let hcard = match self.hcard.take() {
            Some(hcard) => hcard,
            None => {
                let url = self.webfinger().await?.hcard_url.clone();
                let body = self.fetch_document(&url).await?;
                self.parse(DocumentKind::HCard, &url, |parser| {
                    parser.parse_hcard(&body)
                })?
            }
        };
        Ok(self.hcard.insert(hcard))
    }

    /// Runs the remaining steps and assembles the account.
    ///
    /// # Errors
    ///
    /// - `Fetch` / `Parse` from any document step.
    /// - `HandleMismatch` if WebFinger answered for another account; the
    ///   hCard is never requested in that case.
    /// - `IncompleteRecord` if the documents lack a required value such as
    ///   the guid or public key.
    pub async fn fetch(mut self) -> Result<Person, DiscoveryError> {
        tracing::info!(handle = %self.handle, "fetching data");

        let webfinger = self.webfinger().await?.clone();
        let hcard = self.hcard().await?.clone();
        self.build_person(webfinger, hcard)
    }

    fn build_person(&self, webfinger: WebFinger, hcard: HCard) -> Result<Person, DiscoveryError> {
        let handle = self.handle.as_str();
        let supplied = json!({
            "guid": prefer(hcard.guid, webfinger.guid),
            "handle": handle,
            "url": webfinger.seed_url,
            "public_key": prefer(hcard.public_key, webfinger.public_key),
            "profile": {
                "handle": handle,
                "first_name": hcard.first_name,
                "last_name": hcard.last_name,
                "image_url": hcard.photo_large_url,
                "image_url_medium": hcard.photo_medium_url,
                "image_url_small": hcard.photo_small_url,
                "searchable": hcard.searchable,
            },
        });

        let assemble = || -> Result<Person, SchemaError> {
            let record = self.schemas.construct(PERSON, supplied)?;
            self.schemas.validate(&record)?;
            Person::from_record(record)
        };
        assemble().map_err(|cause| {
            tracing::debug!(handle = %self.handle, error = %cause, "incomplete identity record");
            DiscoveryError::IncompleteRecord {
                handle: self.handle.to_string(),
                cause,
            }
        })
    }

    async fn fetch_webfinger(&mut self) -> Result<WebFinger, DiscoveryError> {
        let host_meta = self.host_meta().await?;
        let url = host_meta.webfinger_url(&self.handle);
        let body = self.fetch_document(&url).await?;
        let webfinger = self.parse(DocumentKind::WebFinger, &url, |parser| {
            parser.parse_webfinger(&body)
        })?;

        let actual = normalize(&webfinger.acct_uri);
        if actual != self.handle.as_str() {
            tracing::debug!(handle = %self.handle, actual = %actual, "webfinger subject mismatch");
            return Err(DiscoveryError::HandleMismatch {
                expected: self.handle.to_string(),
                actual,
            });
        }
        Ok(webfinger)
    }

    /// Fetches host-meta, retrying once over HTTP if the HTTPS request fails.
    async fn host_meta(&mut self) -> Result<HostMeta, DiscoveryError> {
        loop {
            let url = self.handle.host_meta_url(self.ssl);
            match self.request(&url).await {
                Ok(body) => {
                    return self.parse(DocumentKind::HostMeta, &url, |parser| {
                        parser.parse_host_meta(&body)
                    });
                }
                Err(cause) if self.ssl => {
                    tracing::warn!(
                        handle = %self.handle,
                        url = %url,
                        error = %cause,
                        "host-meta failed over https, retrying over http"
                    );
                    self.ssl = false;
                }
                Err(cause) => return Err(self.fetch_error(url, cause)),
            }
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<String, DiscoveryError> {
        self.request(url)
            .await
            .map_err(|cause| self.fetch_error(url.to_string(), cause))
    }

    async fn request(&self, url: &str) -> Result<String, FetchFailure> {
        tracing::info!(handle = %self.handle, url = %url, "fetching document");
        let response = self
            .fetcher
            .get(url)
            .await
            .map_err(FetchFailure::Transport)?;
        if !response.is_success() {
            return Err(FetchFailure::Status(response.status));
        }
        Ok(response.body)
    }

    fn fetch_error(&self, url: String, cause: FetchFailure) -> DiscoveryError {
        tracing::debug!(handle = %self.handle, url = %url, error = %cause, "fetch failed");
        DiscoveryError::Fetch {
            url,
            handle: self.handle.to_string(),
            cause,
        }
    }

    fn parse<T>(
        &self,
        document: DocumentKind,
        url: &str,
        run: impl FnOnce(&P) -> Result<T, BoxError>,
    ) -> Result<T, DiscoveryError> {
        run(self.parser).map_err(|cause| {
            tracing::debug!(handle = %self.handle, url = %url, error = %cause, "{document} parse failed");
            DiscoveryError::Parse {
                document,
                url: url.to_string(),
                handle: self.handle.to_string(),
                cause,
            }
        })
    }
}

/// `primary` unless it is absent or empty, else `fallback` under the same rule.
fn prefer(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.filter(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::prefer;

    #[test]
    fn prefers_non_empty_primary() {
        assert_eq!(
            prefer(Some("a".into()), Some("b".into())),
            Some("a".to_string())
        );
        assert_eq!(prefer(Some(String::new()), Some("b".into())), Some("b".to_string()));
        assert_eq!(prefer(None, Some("b".into())), Some("b".to_string()));
        assert_eq!(prefer(None, Some(String::new())), None);
        assert_eq!(prefer(None, None), None);
    }
}
