//! Cluster safety check model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Row};
use chrono::{DateTime, Utc};

/// One persisted "safe to perform maintenance" sample for a cluster.
///
/// Rows are written by the external prober; this service only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SafetyCheckRecord {
    pub cluster_id: String,
    pub check_timestamp: DateTime<Utc>,
    pub safe_to_proceed: bool,
    pub healthy_hosts: i32,
    pub total_hosts: i32,
}

impl SafetyCheckRecord {
    /// Fetch every check in `[start, end]`, optionally restricted to `clusters`.
    ///
    /// An empty or absent cluster list means "all clusters".
    pub async fn fetch_in_range(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        clusters: Option<&[String]>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let clusters: Option<Vec<String>> = clusters
            .filter(|c| !c.is_empty())
            .map(|c| c.to_vec());

        sqlx::query_as::<_, SafetyCheckRecord>(
            r#"
            SELECT cluster_id, check_timestamp, safe_to_proceed, healthy_hosts, total_hosts
            FROM cluster_safety_checks
            WHERE check_timestamp >= $1
              AND check_timestamp <= $2
              AND ($3::text[] IS NULL OR cluster_id = ANY($3))
            ORDER BY check_timestamp ASC
            "#
        )
        .bind(start)
        .bind(end)
        .bind(clusters)
        .fetch_all(pool)
        .await
    }

    /// Distinct cluster ids that have ever reported a safety check.
    pub async fn list_clusters(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT DISTINCT cluster_id FROM cluster_safety_checks ORDER BY cluster_id"
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.get::<String, _>("cluster_id")).collect())
    }
}
