//! Statistics reader
//!
//! Row counts per table plus the last run summary. Read-only; safe to call
//! while a run is writing (WAL).

use crate::models::IngestRun;
use serde::Serialize;
use sqlx::SqlitePool;
use uls_common::Result;

/// Point-in-time view of the store
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub licenses: i64,
    pub entities: i64,
    pub frequencies: i64,
    pub locations: i64,
    pub antennas: i64,
    pub purposes: i64,
    pub active_call_signs: i64,
    pub last_run: Option<IngestRun>,
}

/// Gather counts for every table and the most recent run
pub async fn gather(pool: &SqlitePool) -> Result<DatabaseStats> {
    Ok(DatabaseStats {
        licenses: count(pool, "licenses").await?,
        entities: count(pool, "entities").await?,
        frequencies: count(pool, "frequencies").await?,
        locations: count(pool, "locations").await?,
        antennas: count(pool, "antennas").await?,
        purposes: count(pool, "application_purpose").await?,
        active_call_signs: sqlx::query_scalar(
            "SELECT COUNT(DISTINCT call_sign) FROM licenses WHERE license_status = 'A'",
        )
        .fetch_one(pool)
        .await?,
        last_run: super::history::last_run(pool).await?,
    })
}

async fn count(pool: &SqlitePool, table: &str) -> Result<i64> {
    // Table names come from the fixed list above, never from user input
    let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_start_at_zero() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();

        let stats = gather(&pool).await.unwrap();
        assert_eq!(stats.licenses, 0);
        assert_eq!(stats.entities, 0);
        assert_eq!(stats.active_call_signs, 0);
        assert!(stats.last_run.is_none());
    }
}
