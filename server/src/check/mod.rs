//! Credential Check - compromise signal collection and risk scoring
//!
//! # Components
//! - `providers/`: the four compromise signal sources
//! - `collector.rs`: concurrent fan-out with per-source timeouts
//! - `score.rs`: fixed decision table, vector -> confidence score
//! - `assembler.rs`: caller-facing result + audit record
//! - `audit.rs`: fire-and-forget audit persistence
//!
//! ```text
//! request ──► SignalCollector ──► SignalVector ──► score() ──► assemble()
//!               │ │ │ │                                          │    │
//!      email ◄──┘ │ │ └──► common                      CheckResult   AuditRecord
//!      range ◄────┘ └────► dark web                                   └─► AuditSink (detached)
//! ```

pub mod assembler;
pub mod audit;
pub mod collector;
pub mod providers;
pub mod score;
pub mod types;

use std::sync::Arc;

use sha2::{Digest, Sha256};

pub use assembler::RequestContext;
pub use audit::{AuditSink, PgAuditSink};
pub use collector::{SignalCollector, SignalProviders};
pub use types::{CheckResult, CheckResultData, CredentialCheckRequest, PasswordDigests};

/// Runs the whole check pipeline for one request
pub struct CredentialChecker {
    collector: SignalCollector,
    audit_sink: Arc<dyn AuditSink>,
}

impl CredentialChecker {
    pub fn new(collector: SignalCollector, audit_sink: Arc<dyn AuditSink>) -> Self {
        Self { collector, audit_sink }
    }

    /// Collect, score and assemble. The audit write is started but not awaited.
    pub async fn check(&self, request: &CredentialCheckRequest, context: &RequestContext) -> CheckResult {
        let report = self.collector.collect(request).await;
        let signals = report.to_vector();
        let score = score::score(&signals);

        let (result, record) = assembler::assemble(&signals, score, context);

        tracing::info!(
            account = %email_fingerprint(&request.email),
            pattern = %signals,
            score = score.value(),
            unavailable = report.unavailable_count(),
            table_version = score::SCORE_TABLE_VERSION,
            "Credential check complete"
        );

        audit::spawn_record(self.audit_sink.clone(), record);

        result
    }
}

/// Short stable identifier for an email so logs never carry the address
pub fn email_fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("{:x}", digest)[..12].to_string()
}
