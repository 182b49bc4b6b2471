//! Application purpose table operations

use crate::models::PurposeRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// Insert or fully replace the row keyed by (identifier, purpose_code)
pub async fn upsert(conn: &mut SqliteConnection, record: &PurposeRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO application_purpose (
            unique_system_identifier, uls_file_number, ebf_number,
            call_sign, purpose_code, status_code, status_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(&record.purpose_code)
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
    async fn upsert_keys_on_identifier_and_purpose_code() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let mut record = PurposeRecord {
            unique_system_identifier: "5005".to_string(),
            purpose_code: Some("NE".to_string()),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();
        upsert(&mut conn, &record).await.unwrap();
        record.purpose_code = Some("MD".to_string());
        upsert(&mut conn, &record).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM application_purpose")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
