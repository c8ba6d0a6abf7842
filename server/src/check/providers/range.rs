//! k-anonymity password range lookup
//!
//! Only the first 5 hex characters of the SHA-1 digest leave the process.
//! The source answers with every known suffix under that prefix and the
//! remaining 35 characters are matched locally.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{settle, ProviderError, SignalProvider};
use crate::check::types::Signal;

pub const SHA1_HEX_LEN: usize = 40;
pub const RANGE_PREFIX_LEN: usize = 5;

/// Split a SHA-1 hex digest into the (prefix, suffix) sent / kept.
pub fn split_digest(sha1: &str) -> Result<(&str, &str), ProviderError> {
    if sha1.len() != SHA1_HEX_LEN || !sha1.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProviderError::InvalidDigest(format!(
            "expected {} hex characters, got {}",
            SHA1_HEX_LEN,
            sha1.len()
        )));
    }

    Ok(sha1.split_at(RANGE_PREFIX_LEN))
}

/// One `SUFFIX:COUNT` line of a range response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    pub suffix: String,
    pub count: u64,
}

/// Parse a range response body. Lines may end in CRLF or LF.
pub fn parse_range_body(body: &str) -> Result<Vec<RangeEntry>, ProviderError> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (suffix, count) = line
                .split_once(':')
                .ok_or_else(|| ProviderError::Malformed(format!("missing ':' in {:?}", line)))?;

            let count = count
                .trim()
                .parse::<u64>()
                .map_err(|_| ProviderError::Malformed(format!("bad count in {:?}", line)))?;

            Ok(RangeEntry {
                suffix: suffix.to_string(),
                count,
            })
        })
        .collect()
}

/// Occurrence count for `suffix` in a parsed range, matched case-insensitively
pub fn range_count(entries: &[RangeEntry], suffix: &str) -> Option<u64> {
    entries
        .iter()
        .find(|e| e.suffix.eq_ignore_ascii_case(suffix))
        .map(|e| e.count)
}

/// Queries `{base}/range/{prefix}`.
pub struct PasswordRangeProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PasswordRangeProvider {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub(crate) fn range_url(&self, prefix: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("range")
            .push(prefix);

        Ok(url)
    }

    async fn lookup(&self, sha1: &str) -> Result<bool, ProviderError> {
        let (prefix, suffix) = split_digest(sha1)?;
        let url = self.range_url(prefix)?;

        let mut request = self.http_client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("hibp-api-key", key);
        }

        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let entries = parse_range_body(&body)?;

        match range_count(&entries, suffix) {
            Some(count) => {
                tracing::debug!(prefix, occurrences = count, "Password found in breach range");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SignalProvider for PasswordRangeProvider {
    fn name(&self) -> &'static str {
        "password_range"
    }

    async fn check(&self, sha1: &str) -> Signal {
        settle(self.name(), self.lookup(sha1).await)
    }
}
