//! Signal Providers
//!
//! Each provider wraps one external "has this been compromised" source.
//!
//! # Components
//! - `email.rs`: breached-account lookup by email
//! - `range.rs`: k-anonymity password range lookup (5-char SHA-1 prefix)
//! - `known.rs`: existence lookups in the common / dark-web password tables
//!
//! Providers never return errors to the caller: every failure is logged and
//! reported as `Signal::Unavailable`.

pub mod email;
pub mod known;
pub mod range;

use async_trait::async_trait;

use super::types::Signal;

pub use email::EmailBreachProvider;
pub use known::{CorpusStore, KnownPasswordProvider, PgCorpusStore};
pub use range::PasswordRangeProvider;

/// Why a lookup could not produce an answer
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One compromise signal source.
///
/// `identifier` is the email for the email provider and the SHA-1 digest
/// of the password for the others.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    /// Short stable name used in logs
    fn name(&self) -> &'static str;

    async fn check(&self, identifier: &str) -> Signal;
}

/// Collapse a lookup outcome into a signal, logging failures.
pub(crate) fn settle(provider: &'static str, outcome: Result<bool, ProviderError>) -> Signal {
    match outcome {
        Ok(hit) => Signal::from(hit),
        Err(e) => {
            tracing::warn!(provider, error = %e, "Signal source unavailable");
            Signal::Unavailable
        }
    }
}
