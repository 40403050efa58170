//! `reqwest`-backed [`Fetcher`].

use crate::config::{ConfigError, HttpConfig};
use crate::fetcher::{BoxError, Fetcher, Response};
use std::time::Duration;

/// The response body exceeded the configured limit.
#[derive(Debug, thiserror::Error)]
#[error("response body exceeds {limit} bytes")]
pub struct BodyTooLarge {
    pub limit: usize,
}

/// Production fetcher over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Builds the client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Response, BoxError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        let limit = self.max_body_bytes;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(Box::new(BodyTooLarge { limit }));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Box::new(BodyTooLarge { limit }));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Response {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}
