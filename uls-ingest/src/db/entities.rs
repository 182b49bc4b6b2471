//! Entity table operations

use crate::models::EntityRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// Call sign currently attached to an identifier's entity row.
///
/// Outer None: no row. Inner None: a row exists but holds no call sign.
pub async fn load_call_sign(
    conn: &mut SqliteConnection,
    unique_system_identifier: &str,
) -> Result<Option<Option<String>>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT call_sign FROM entities WHERE unique_system_identifier = ?")
            .bind(unique_system_identifier)
            .fetch_optional(conn)
            .await?;

    Ok(row.map(|(call_sign,)| call_sign))
}

/// Insert or fully replace the row for the record's identifier
pub async fn upsert(conn: &mut SqliteConnection, record: &EntityRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO entities (
            unique_system_identifier, uls_file_number, ebf_number,
            call_sign, entity_type, licensee_id, entity_name,
            first_name, mi, last_name, suffix, phone,
            fax, email, street_address, city, state,
            zip_code, po_box, attention_line, sgin,
            frn, applicant_type_code, applicant_type_other,
            status_code, status_date, lic_category_code,
            linked_license_id, linked_callsign
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(&record.entity_type)
    .bind(&record.licensee_id)
    .bind(&record.entity_name)
    .bind(&record.first_name)
    .bind(&record.mi)
    .bind(&record.last_name)
    .bind(&record.suffix)
    .bind(&record.phone)
    .bind(&record.fax)
    .bind(&record.email)
    .bind(&record.street_address)
    .bind(&record.city)
    .bind(&record.state)
    .bind(&record.zip_code)
    .bind(&record.po_box)
    .bind(&record.attention_line)
    .bind(&record.sgin)
    .bind(&record.frn)
    .bind(&record.applicant_type_code)
    .bind(&record.applicant_type_other)
    .bind(&record.status_code)
    .bind(&record.status_date)
    .bind(&record.lic_category_code)
    .bind(&record.linked_license_id)
    .bind(&record.linked_callsign)
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn call_sign_lookup_distinguishes_missing_row_from_null() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(load_call_sign(&mut conn, "1001").await.unwrap(), None);

        let record = EntityRecord {
            unique_system_identifier: "1001".to_string(),
            entity_name: Some("Example Communications".to_string()),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();

        assert_eq!(load_call_sign(&mut conn, "1001").await.unwrap(), Some(None));

        let record = EntityRecord {
            unique_system_identifier: "1001".to_string(),
            call_sign: Some("ABC123".to_string()),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();

        assert_eq!(
            load_call_sign(&mut conn, "1001").await.unwrap(),
            Some(Some("ABC123".to_string()))
        );
    }
}
