//! Frequency table operations

use crate::models::FrequencyRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// Insert or fully replace the row keyed by
/// (identifier, frequency_number, frequency_seq_id)
pub async fn upsert(conn: &mut SqliteConnection, record: &FrequencyRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO frequencies (
            unique_system_identifier, uls_file_number, ebf_number,
            call_sign, frequency_assigned, frequency_upper_band,
            frequency_carrier, frequency_offset, emission_designator,
            power_output, power_erp, tolerance, frequency_number,
            frequency_seq_id, status_code, status_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(record.frequency_assigned)
    .bind(record.frequency_upper_band)
    .bind(record.frequency_carrier)
    .bind(record.frequency_offset)
    .bind(&record.emission_designator)
    .bind(record.power_output)
    .bind(record.power_erp)
    .bind(record.tolerance)
    .bind(record.frequency_number)
    .bind(record.frequency_seq_id)
    .bind(&record.status_code)
    .bind(&record.status_date)
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[tokio::test]
    async fn upsert_is_idempotent_by_composite_key() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let mut record = FrequencyRecord {
            unique_system_identifier: "2002".to_string(),
            frequency_assigned: Some(465.0125),
            frequency_number: Some(1),
            frequency_seq_id: Some(1),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();
        record.frequency_assigned = Some(465.025);
        upsert(&mut conn, &record).await.unwrap();

        // Different sequence id: new row
        record.frequency_seq_id = Some(2);
        upsert(&mut conn, &record).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM frequencies")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
