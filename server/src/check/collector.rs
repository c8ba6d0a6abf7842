//! Signal Collector
//!
//! Fans out to the four providers concurrently, bounds each with its own
//! timeout and always produces a complete `SignalVector`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use super::providers::SignalProvider;
use super::types::{CredentialCheckRequest, Signal, SignalVector};

/// Position of each provider in the signal vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    EmailBreached = 0,
    PasswordBreachedGlobally = 1,
    PasswordBreachedDarkWeb = 2,
    PasswordIsCommon = 3,
}

/// The four providers, one per signal
#[derive(Clone)]
pub struct SignalProviders {
    pub email_breach: Arc<dyn SignalProvider>,
    pub password_breach: Arc<dyn SignalProvider>,
    pub dark_web_password: Arc<dyn SignalProvider>,
    pub common_password: Arc<dyn SignalProvider>,
}

/// Raw provider outcomes before fail-open collapsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalReport {
    pub email_breached: Signal,
    pub password_breached_globally: Signal,
    pub password_breached_dark_web: Signal,
    pub password_is_common: Signal,
}

impl SignalReport {
    fn from_slots(slots: [Signal; 4]) -> Self {
        Self {
            email_breached: slots[Slot::EmailBreached as usize],
            password_breached_globally: slots[Slot::PasswordBreachedGlobally as usize],
            password_breached_dark_web: slots[Slot::PasswordBreachedDarkWeb as usize],
            password_is_common: slots[Slot::PasswordIsCommon as usize],
        }
    }

    /// Unavailable sources count as absent
    pub fn to_vector(&self) -> SignalVector {
        SignalVector::new(
            self.email_breached.is_present(),
            self.password_breached_globally.is_present(),
            self.password_breached_dark_web.is_present(),
            self.password_is_common.is_present(),
        )
    }

    pub fn unavailable_count(&self) -> usize {
        [
            self.email_breached,
            self.password_breached_globally,
            self.password_breached_dark_web,
            self.password_is_common,
        ]
        .iter()
        .filter(|s| **s == Signal::Unavailable)
        .count()
    }
}

pub struct SignalCollector {
    providers: SignalProviders,
    timeout: Duration,
}

impl SignalCollector {
    pub fn new(providers: SignalProviders, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Query every provider and wait for all of them to settle.
    ///
    /// Each provider runs in its own task so a panic stays local to its slot.
    /// Dropping the returned future aborts any lookup still in flight.
    pub async fn collect(&self, request: &CredentialCheckRequest) -> SignalReport {
        let sha1 = &request.password_digests.sha1;
        let lookups = [
            (Slot::EmailBreached, self.providers.email_breach.clone(), request.email.clone()),
            (Slot::PasswordBreachedGlobally, self.providers.password_breach.clone(), sha1.clone()),
            (Slot::PasswordBreachedDarkWeb, self.providers.dark_web_password.clone(), sha1.clone()),
            (Slot::PasswordIsCommon, self.providers.common_password.clone(), sha1.clone()),
        ];

        let mut tasks = JoinSet::new();
        for (slot, provider, identifier) in lookups {
            let limit = self.timeout;
            tasks.spawn(async move { (slot, bounded(provider.as_ref(), &identifier, limit).await) });
        }

        let mut slots = [Signal::Unavailable; 4];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, signal)) => slots[slot as usize] = signal,
                Err(e) => tracing::error!(error = %e, "Signal provider task failed"),
            }
        }

        SignalReport::from_slots(slots)
    }
}

async fn bounded(provider: &dyn SignalProvider, identifier: &str, limit: Duration) -> Signal {
    match tokio::time::timeout(limit, provider.check(identifier)).await {
        Ok(signal) => signal,
        Err(_) => {
            tracing::warn!(
                provider = provider.name(),
                timeout_ms = limit.as_millis() as u64,
                "Signal source timed out"
            );
            Signal::Unavailable
        }
    }
}
