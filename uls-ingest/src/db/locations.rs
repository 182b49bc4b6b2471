//! Location table operations

use crate::models::LocationRecord;
use sqlx::SqliteConnection;
use uls_common::Result;

/// Insert or fully replace the row keyed by (identifier, location_number)
pub async fn upsert(conn: &mut SqliteConnection, record: &LocationRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO locations (
            unique_system_identifier, uls_file_number, ebf_number, call_sign,
            location_action_performed, location_type_code, location_class_code,
            location_number, site_status, corresponding_fixed_location,
            location_address, location_city, location_county, location_state,
            radius_of_operation, area_of_operation_code, clearance_indicator,
            ground_elevation, lat_degrees, lat_minutes, lat_seconds, lat_direction,
            long_degrees, long_minutes, long_seconds, long_direction,
            max_lat_degrees, max_lat_minutes, max_lat_seconds, max_lat_direction,
            max_long_degrees, max_long_minutes, max_long_seconds, max_long_direction,
            nepa, quiet_zone_notification_date, tower_registration_number,
            height_of_support_structure, overall_height_of_structure, structure_type,
            airport_id, location_name, units_hand_held, units_mobile,
            units_temp_fixed, units_aircraft, units_itinerant, status_code, status_date,
            earth_station_agreement
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                  ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.unique_system_identifier)
    .bind(&record.uls_file_number)
    .bind(&record.ebf_number)
    .bind(&record.call_sign)
    .bind(&record.location_action_performed)
    .bind(&record.location_type_code)
    .bind(&record.location_class_code)
    .bind(record.location_number)
    .bind(&record.site_status)
    .bind(record.corresponding_fixed_location)
    .bind(&record.location_address)
    .bind(&record.location_city)
    .bind(&record.location_county)
    .bind(&record.location_state)
    .bind(record.radius_of_operation)
    .bind(&record.area_of_operation_code)
    .bind(&record.clearance_indicator)
    .bind(record.ground_elevation)
    .bind(record.lat_degrees)
    .bind(record.lat_minutes)
    .bind(record.lat_seconds)
    .bind(&record.lat_direction)
    .bind(record.long_degrees)
    .bind(record.long_minutes)
    .bind(record.long_seconds)
    .bind(&record.long_direction)
    .bind(record.max_lat_degrees)
    .bind(record.max_lat_minutes)
    .bind(record.max_lat_seconds)
    .bind(&record.max_lat_direction)
    .bind(record.max_long_degrees)
    .bind(record.max_long_minutes)
    .bind(record.max_long_seconds)
    .bind(&record.max_long_direction)
    .bind(&record.nepa)
    .bind(&record.quiet_zone_notification_date)
    .bind(&record.tower_registration_number)
    .bind(record.height_of_support_structure)
    .bind(record.overall_height_of_structure)
    .bind(&record.structure_type)
    .bind(&record.airport_id)
    .bind(&record.location_name)
    .bind(&record.units_hand_held)
    .bind(&record.units_mobile)
    .bind(&record.units_temp_fixed)
    .bind(&record.units_aircraft)
    .bind(&record.units_itinerant)
    .bind(&record.status_code)
    .bind(&record.status_date)
    .bind(&record.earth_station_agreement)
    .execute(conn)
    .await?;

    Ok(())
}
