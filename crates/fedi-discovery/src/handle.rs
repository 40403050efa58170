//! Handle normalization and URL derivation.

use crate::error::DiscoveryError;
use std::fmt;

const ACCT_SCHEME: &str = "acct:";

/// Normalizes a raw handle: trims whitespace, strips any leading `acct:`
/// (case-insensitive) and lowercases.
///
/// Normalization is idempotent. It performs no shape checks; see
/// [`Handle::parse`].
pub fn normalize(raw: &str) -> String {
    let mut rest = raw.trim();
    while let Some(stripped) = strip_acct_scheme(rest) {
        rest = stripped.trim();
    }
    rest.to_lowercase()
}

fn strip_acct_scheme(value: &str) -> Option<&str> {
    let scheme = value.get(..ACCT_SCHEME.len())?;
    if scheme.eq_ignore_ascii_case(ACCT_SCHEME) {
        value.get(ACCT_SCHEME.len()..)
    } else {
        None
    }
}

/// A normalized `local@domain` handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    value: String,
    at: usize,
}

impl Handle {
    /// Normalizes `raw` and checks it has exactly one `@` with a non-empty
    /// local part and domain.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidHandle` otherwise.
    pub fn parse(raw: &str) -> Result<Self, DiscoveryError> {
        let value = normalize(raw);
        match value.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                let at = local.len();
                Ok(Self { value, at })
            }
            _ => Err(DiscoveryError::InvalidHandle { handle: value }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn local(&self) -> &str {
        &self.value[..self.at]
    }

    pub fn domain(&self) -> &str {
        &self.value[self.at + 1..]
    }

    /// `http[s]://{domain}/.well-known/host-meta`
    pub fn host_meta_url(&self, ssl: bool) -> String {
        let scheme = if ssl { "https" } else { "http" };
        format!("{scheme}://{}/.well-known/host-meta", self.domain())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
