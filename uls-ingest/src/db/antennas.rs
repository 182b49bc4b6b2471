//! Antenna table operations

use crate::models::AntennaRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// Insert or fully replace the row keyed by
/// (identifier, antenna_number, location_number)
pub async fn upsert(conn: &mut SqliteConnection, record: &AntennaRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO antennas (
            unique_system_identifier, uls_file_number, ebf_number, call_sign,
            antenna_action_performed, antenna_number, location_number, receiver_number,
            antenna_type_code, height_to_tip, height_to_center_raat, antenna_make,
            antenna_model, tilt_toward, tilt_angle, polarization_code,
            beamwidth_horiz, beamwidth_vert, gain, azimuth, height_above_avg_terrain,
            diversity_height, diversity_gain, diversity_beam, reflector_height,
            reflector_width, reflector_separation, repeater_height, repeater_width,
            repeater_separation, commanded_azimuth, commanded_elevation, twist,
            settle_time, comment_text, status_code, status_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(&record.antenna_action_performed)
    .bind(record.antenna_number)
    .bind(record.location_number)
    .bind(record.receiver_number)
    .bind(&record.antenna_type_code)
    .bind(record.height_to_tip)
    .bind(record.height_to_center_raat)
    .bind(&record.antenna_make)
    .bind(&record.antenna_model)
    .bind(record.tilt_toward)
    .bind(record.tilt_angle)
    .bind(&record.polarization_code)
    .bind(record.beamwidth_horiz)
    .bind(record.beamwidth_vert)
    .bind(record.gain)
    .bind(record.azimuth)
    .bind(record.height_above_avg_terrain)
    .bind(record.diversity_height)
    .bind(record.diversity_gain)
    .bind(record.diversity_beam)
    .bind(record.reflector_height)
    .bind(record.reflector_width)
    .bind(record.reflector_separation)
    .bind(record.repeater_height)
    .bind(record.repeater_width)
    .bind(record.repeater_separation)
    .bind(record.commanded_azimuth)
    .bind(record.commanded_elevation)
    .bind(record.twist)
    .bind(record.settle_time)
    .bind(&record.comment_text)
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
    async fn upsert_keys_on_antenna_and_location_number() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let mut record = AntennaRecord {
            unique_system_identifier: "4004".to_string(),
            antenna_number: Some(1),
            location_number: Some(1),
            gain: Some(6.0),
            ..Default::default()
        };
        upsert(&mut conn, &record).await.unwrap();
        record.gain = Some(9.8);
        upsert(&mut conn, &record).await.unwrap();
        record.antenna_number = Some(2);
        upsert(&mut conn, &record).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM antennas")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
