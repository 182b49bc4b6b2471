//! License table operations

use crate::models::LicenseRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// The slice of an existing license row the merge policy looks at
#[derive(Debug, Clone, Default)]
pub struct ExistingLicense {
    pub license_status: Option<String>,
    pub grant_date: Option<String>,
    pub expired_date: Option<String>,
}

impl ExistingLicense {
    /// Both authorization dates present and non-blank
    pub fn has_both_dates(&self) -> bool {
        non_blank(&self.grant_date) && non_blank(&self.expired_date)
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Load the merge-relevant fields of the row for an identifier, if any
pub async fn load_existing(
    conn: &mut SqliteConnection,
    unique_system_identifier: &str,
) -> Result<Option<ExistingLicense>> {
    let row: Option<(Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT license_status, grant_date, expired_date FROM licenses \
         WHERE unique_system_identifier = ?",
    )
    .bind(unique_system_identifier)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|(license_status, grant_date, expired_date)| ExistingLicense {
        license_status,
        grant_date,
        expired_date,
    }))
}

/// Insert or fully replace the row for the record's identifier
pub async fn upsert(conn: &mut SqliteConnection, record: &LicenseRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO licenses (
            unique_system_identifier, uls_file_number, ebf_number,
            call_sign, license_status, radio_service_type,
            grant_date, expired_date, cancellation_date,
            eligibility_rule_num, applicant_type_code, alien,
            alien_government, alien_corporation, alien_officer,
            alien_control, revoked, convicted, adjudged,
            involved_reserved, common_carrier, non_common_carrier,
            private_comm, fixed, mobile, radiolocation,
            satellite, developmental_or_sta, interconnected_service,
            certifier_first_name, certifier_mi, certifier_last_name,
            certifier_suffix, certifier_title, gender,
            african_american, native_american, hawaiian,
            asian, white, ethnicity, effective_date,
            last_action_date, auction_id, reg_stat_broad_serv,
            band_manager, type_serv_broad_serv, alien_ruling,
            licensee_name_change, whitespace_ind, additional_cert_choice,
            additional_cert_answer, discontinuation_ind,
            regulatory_compliance_ind, eligibility_cert_900,
            transition_plan_cert_900, return_spectrum_cert_900,
            payment_cert_900
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(&record.license_status)
    .bind(&record.radio_service_type)
    .bind(&record.grant_date)
    .bind(&record.expired_date)
    .bind(&record.cancellation_date)
    .bind(&record.eligibility_rule_num)
    .bind(&record.applicant_type_code)
    .bind(&record.alien)
    .bind(&record.alien_government)
    .bind(&record.alien_corporation)
    .bind(&record.alien_officer)
    .bind(&record.alien_control)
    .bind(&record.revoked)
    .bind(&record.convicted)
    .bind(&record.adjudged)
    .bind(&record.involved_reserved)
    .bind(&record.common_carrier)
    .bind(&record.non_common_carrier)
    .bind(&record.private_comm)
    .bind(&record.fixed)
    .bind(&record.mobile)
    .bind(&record.radiolocation)
    .bind(&record.satellite)
    .bind(&record.developmental_or_sta)
    .bind(&record.interconnected_service)
    .bind(&record.certifier_first_name)
    .bind(&record.certifier_mi)
    .bind(&record.certifier_last_name)
    .bind(&record.certifier_suffix)
    .bind(&record.certifier_title)
    .bind(&record.gender)
    .bind(&record.african_american)
    .bind(&record.native_american)
    .bind(&record.hawaiian)
    .bind(&record.asian)
    .bind(&record.white)
    .bind(&record.ethnicity)
    .bind(&record.effective_date)
    .bind(&record.last_action_date)
    .bind(&record.auction_id)
    .bind(&record.reg_stat_broad_serv)
    .bind(&record.band_manager)
    .bind(&record.type_serv_broad_serv)
    .bind(&record.alien_ruling)
    .bind(&record.licensee_name_change)
    .bind(&record.whitespace_ind)
    .bind(&record.additional_cert_choice)
    .bind(&record.additional_cert_answer)
    .bind(&record.discontinuation_ind)
    .bind(&record.regulatory_compliance_ind)
    .bind(&record.eligibility_cert_900)
    .bind(&record.transition_plan_cert_900)
    .bind(&record.return_spectrum_cert_900)
    .bind(&record.payment_cert_900)
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
    async fn upsert_replaces_by_identifier() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut record = LicenseRecord {
            unique_system_identifier: "1001".to_string(),
            call_sign: Some("WQAB123".to_string()),
            license_status: Some("A".to_string()),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();

        record.license_status = Some("E".to_string());
        upsert(&mut conn, &record).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM licenses")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let existing = load_existing(&mut conn, "1001").await.unwrap().unwrap();
        assert_eq!(existing.license_status.as_deref(), Some("E"));
    }

    #[tokio::test]
    async fn load_existing_returns_none_for_unknown_identifier() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        assert!(load_existing(&mut conn, "9999").await.unwrap().is_none());
    }

    #[test]
    fn has_both_dates_requires_non_blank_values() {
        let existing = ExistingLicense {
            license_status: Some("A".to_string()),
            grant_date: Some("20200101".to_string()),
            expired_date: Some("  ".to_string()),
        };
        assert!(!existing.has_both_dates());
    }
}
