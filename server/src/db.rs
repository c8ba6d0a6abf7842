//! Database module - PostgreSQL connection and migrations

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Postgres rejects multiple statements in one prepared query
    for statement in SCHEMA_SQL.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await?;
    }

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Users
CREATE TABLE IF NOT EXISTS users (
    user_id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    firstname VARCHAR(255) NOT NULL,
    lastname VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    api_key VARCHAR(128) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ DEFAULT NOW()
);

-- Known-compromised password corpora (lowercase SHA-1 hex)
CREATE TABLE IF NOT EXISTS common_passwords (
    sha1_password CHAR(40) PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS darkweb_passwords (
    sha1_password CHAR(40) PRIMARY KEY
);

-- Check audit trail (append-only)
CREATE TABLE IF NOT EXISTS check_logs (
    id BIGSERIAL PRIMARY KEY,
    hibp_email BOOLEAN NOT NULL,
    hibp_password BOOLEAN NOT NULL,
    darkweb_password BOOLEAN NOT NULL,
    common_password BOOLEAN NOT NULL,
    combination INTEGER NOT NULL,
    score SMALLINT NOT NULL,
    ip_address VARCHAR(45) NOT NULL,
    timestamp BIGINT NOT NULL,
    created_at TIMESTAMPTZ DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_check_logs_timestamp ON check_logs(timestamp)
"#;
