//! Fuzzy search readers
//!
//! Licensee-name substring search and frequency range search over the
//! relational store. Both are read-only collaborator surfaces.

use serde::Serialize;
use sqlx::SqlitePool;
use uls_common::Result;

/// One licensee-name search hit
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LicenseeMatch {
    pub call_sign: Option<String>,
    pub entity_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub license_status: Option<String>,
    pub radio_service_type: Option<String>,
}

/// One frequency range search hit
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FrequencyMatch {
    pub call_sign: Option<String>,
    pub frequency_assigned: Option<f64>,
    pub emission_designator: Option<String>,
    pub power_erp: Option<f64>,
    pub entity_name: Option<String>,
    pub state: Option<String>,
}

/// Prefix/range query reader
pub struct SearchReader {
    db: SqlitePool,
}

impl SearchReader {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Case-insensitive substring search over licensee names.
    ///
    /// Matches either the organization name or the "first last" personal
    /// name; optionally filtered to one state.
    pub async fn by_licensee(
        &self,
        name: &str,
        state: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LicenseeMatch>> {
        let pattern = format!("%{}%", name.trim().to_uppercase());

        let mut sql = String::from(
            r#"
            SELECT e.call_sign, e.entity_name, e.first_name, e.last_name,
                   e.city, e.state, l.license_status, l.radio_service_type
            FROM entities e
            LEFT JOIN licenses l
                ON e.unique_system_identifier = l.unique_system_identifier
            WHERE e.call_sign IS NOT NULL
              AND (UPPER(e.entity_name) LIKE ?
                   OR UPPER(COALESCE(e.first_name, '') || ' ' || COALESCE(e.last_name, '')) LIKE ?)
            "#,
        );
        if state.is_some() {
            sql.push_str(" AND UPPER(e.state) = ? ");
        }
        sql.push_str(" ORDER BY e.entity_name LIMIT ? ");

        let mut query = sqlx::query_as::<_, LicenseeMatch>(&sql)
            .bind(pattern.clone())
            .bind(pattern);
        if let Some(state) = state {
            query = query.bind(state.trim().to_uppercase());
        }
        let matches = query.bind(limit).fetch_all(&self.db).await?;

        Ok(matches)
    }

    /// Frequencies within `tolerance` of `mhz`, grouped so one call sign
    /// appears once per distinct frequency; optionally filtered by state.
    pub async fn by_frequency(
        &self,
        mhz: f64,
        tolerance: f64,
        state: Option<&str>,
        limit: i64,
    ) -> Result<Vec<FrequencyMatch>> {
        let mut sql = String::from(
            r#"
            SELECT f.call_sign, f.frequency_assigned, f.emission_designator,
                   f.power_erp, e.entity_name, e.state
            FROM frequencies f
            LEFT JOIN entities e
                ON f.unique_system_identifier = e.unique_system_identifier
            WHERE f.frequency_assigned BETWEEN ? AND ?
            "#,
        );
        if state.is_some() {
            sql.push_str(" AND UPPER(e.state) = ? ");
        }
        sql.push_str(
            r#"
            GROUP BY f.call_sign, f.frequency_assigned
            ORDER BY f.frequency_assigned, f.call_sign
            LIMIT ?
            "#,
        );

        let mut query = sqlx::query_as::<_, FrequencyMatch>(&sql)
            .bind(mhz - tolerance)
            .bind(mhz + tolerance);
        if let Some(state) = state {
            query = query.bind(state.trim().to_uppercase());
        }
        let matches = query.bind(limit).fetch_all(&self.db).await?;

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{entities, frequencies, licenses};
    use crate::models::{EntityRecord, FrequencyRecord, LicenseRecord};

    async fn seed() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let rows = [
            ("1001", "WQAB123", "Mountain Radio Partners", "CO", 465.0125),
            ("1002", "WQCD456", "Valley Dispatch", "CO", 465.5),
            ("1003", "KXYZ789", "Mountain Rescue Unit", "UT", 154.265),
        ];
        for (usi, cs, name, state, freq) in rows {
            let license = LicenseRecord {
                unique_system_identifier: usi.to_string(),
                call_sign: Some(cs.to_string()),
                license_status: Some("A".to_string()),
                ..Default::default()
            };
            licenses::upsert(&mut conn, &license).await.unwrap();

            let entity = EntityRecord {
                unique_system_identifier: usi.to_string(),
                call_sign: Some(cs.to_string()),
                entity_name: Some(name.to_string()),
                state: Some(state.to_string()),
                ..Default::default()
            };
            entities::upsert(&mut conn, &entity).await.unwrap();

            let frequency = FrequencyRecord {
                unique_system_identifier: usi.to_string(),
                call_sign: Some(cs.to_string()),
                frequency_assigned: Some(freq),
                frequency_number: Some(1),
                frequency_seq_id: Some(1),
                ..Default::default()
            };
            frequencies::upsert(&mut conn, &frequency).await.unwrap();
        }

        pool
    }

    #[tokio::test]
    async fn licensee_search_is_case_insensitive_substring() {
        let pool = seed().await;
        let reader = SearchReader::new(pool);

        let matches = reader.by_licensee("mountain", None, 50).await.unwrap();
        assert_eq!(matches.len(), 2);

        let matches = reader.by_licensee("mountain", Some("co"), 50).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].call_sign.as_deref(), Some("WQAB123"));
        assert_eq!(matches[0].license_status.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn frequency_search_uses_tolerance_window() {
        let pool = seed().await;
        let reader = SearchReader::new(pool);

        let matches = reader.by_frequency(465.0125, 0.001, None, 50).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].call_sign.as_deref(), Some("WQAB123"));

        let matches = reader.by_frequency(465.0, 1.0, None, 50).await.unwrap();
        assert_eq!(matches.len(), 2);
    }
}
