//! Database module - PostgreSQL connection and schema bootstrap

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Multiple statements: use raw_sql so they run in one round-trip
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Cluster safety checks (written by the prober, read here)
CREATE TABLE IF NOT EXISTS cluster_safety_checks (
    id BIGSERIAL PRIMARY KEY,
    cluster_id VARCHAR(255) NOT NULL,
    check_timestamp TIMESTAMPTZ NOT NULL,
    safe_to_proceed BOOLEAN NOT NULL,
    healthy_hosts INT NOT NULL CHECK (healthy_hosts >= 0),
    total_hosts INT NOT NULL CHECK (total_hosts >= healthy_hosts),
    details JSONB,
    created_at TIMESTAMPTZ DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_safety_checks_cluster_ts ON cluster_safety_checks(cluster_id, check_timestamp);
CREATE INDEX IF NOT EXISTS idx_safety_checks_ts ON cluster_safety_checks(check_timestamp);
"#;
