//! Audit persistence
//!
//! The audit write is fire-and-forget: the check response never waits on it
//! and a failed write is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use super::types::AuditRecord;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Durable append-only destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Writes records to the `check_logs` table
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        if self.pool.is_closed() {
            return Err(AuditError::Unavailable("connection pool closed".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO check_logs
                (hibp_email, hibp_password, darkweb_password, common_password, combination, score, ip_address, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
        .bind(record.email_breached)
        .bind(record.password_breached_globally)
        .bind(record.password_breached_dark_web)
        .bind(record.password_is_common)
        .bind(combination_key(record))
        .bind(i16::from(record.score.value()))
        .bind(&record.source_ip)
        .bind(record.timestamp_seconds)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Value of the `combination` column
pub fn combination_key(record: &AuditRecord) -> i32 {
    record.signals().legacy_key() as i32
}

/// Persist `record` on a detached task.
///
/// The handle is returned for tests only; callers on the request path drop it.
pub fn spawn_record(sink: Arc<dyn AuditSink>, record: AuditRecord) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sink.record(&record).await {
            Ok(()) => tracing::debug!(score = record.score.value(), "Audit record stored"),
            Err(e) => tracing::error!(error = %e, "Failed to store audit record"),
        }
    })
}
