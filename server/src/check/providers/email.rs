//! Breached-account lookup by email

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{settle, ProviderError, SignalProvider};
use crate::check::types::Signal;

/// Queries `{base}/breachedaccount/{email}`.
///
/// 200 means the account appears in at least one breach, 404 means it
/// does not. Anything else is an unavailable source.
pub struct EmailBreachProvider {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EmailBreachProvider {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub(crate) fn account_url(&self, email: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("breachedaccount")
            .push(email);

        Ok(url)
    }

    async fn lookup(&self, email: &str) -> Result<bool, ProviderError> {
        let url = self.account_url(email)?;

        let mut request = self.http_client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("hibp-api-key", key);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ProviderError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl SignalProvider for EmailBreachProvider {
    fn name(&self) -> &'static str {
        "email_breach"
    }

    async fn check(&self, email: &str) -> Signal {
        settle(self.name(), self.lookup(email).await)
    }
}
