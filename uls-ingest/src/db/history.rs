//! Run-history ledger operations

use crate::models::IngestRun;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uls_common::{Error, Result};
use uuid::Uuid;

/// Append one run-history row (exactly one per pipeline run)
pub async fn append_run(pool: &SqlitePool, run: &IngestRun) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ingest_runs
            (id, run_date, dataset, bytes_fetched, records_processed, success, error_message)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(run.id.to_string())
    .bind(run.run_date.to_rfc3339())
    .bind(&run.dataset)
    .bind(run.bytes_fetched)
    .bind(run.records_processed)
    .bind(run.success)
    .bind(&run.error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent run, if any
pub async fn last_run(pool: &SqlitePool) -> Result<Option<IngestRun>> {
    let row = sqlx::query(
        r#"
        SELECT id, run_date, dataset, bytes_fetched, records_processed, success, error_message
        FROM ingest_runs
        ORDER BY run_date DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id_str: String = row.get("id");
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| Error::Internal(format!("Bad run id '{}': {}", id_str, e)))?;

            let date_str: String = row.get("run_date");
            let run_date = DateTime::parse_from_rfc3339(&date_str)
                .map_err(|e| Error::Internal(format!("Bad run date '{}': {}", date_str, e)))?
                .with_timezone(&Utc);

            Ok(Some(IngestRun {
                id,
                run_date,
                dataset: row.get("dataset"),
                bytes_fetched: row.get("bytes_fetched"),
                records_processed: row.get("records_processed"),
                success: row.get("success"),
                error_message: row.get("error_message"),
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_read_back_last_run() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();

        assert!(last_run(&pool).await.unwrap().is_none());

        let mut run = IngestRun::new("LM");
        run.bytes_fetched = 1024;
        run.records_processed = 42;
        append_run(&pool, &run).await.unwrap();

        let read = last_run(&pool).await.unwrap().unwrap();
        assert_eq!(read.id, run.id);
        assert_eq!(read.bytes_fetched, 1024);
        assert_eq!(read.records_processed, 42);
        assert!(read.success);
        assert!(read.error_message.is_none());
    }
}
