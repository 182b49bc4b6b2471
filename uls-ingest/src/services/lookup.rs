//! Single-call-sign detail reader
//!
//! Joins all six entity tables by call sign into one report. Read-only
//! collaborator surface; the pipeline never calls this.

use serde::Serialize;
use sqlx::SqlitePool;
use uls_common::Result;

/// Human-readable text for a license/application status code
pub fn status_text(code: &str) -> String {
    let text = match code.trim().to_uppercase().as_str() {
        "A" => "Active",
        "E" => "Expired",
        "T" => "Terminated",
        "C" => "Cancelled",
        "L" => "License",
        "P" => "Pending",
        "R" => "Received",
        "Q" => "Accepted for Filing",
        "X" => "Dismissed",
        "G" => "Granted",
        _ => return format!("Unknown ({})", code),
    };
    text.to_string()
}

/// Convert disaggregated degrees/minutes/seconds plus hemisphere into
/// signed decimal degrees. Degrees and minutes are required; seconds
/// default to zero; hemisphere defaults to N/E (positive).
pub fn dms_to_decimal(
    degrees: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<f64>,
    direction: Option<&str>,
) -> Option<f64> {
    let degrees = degrees?;
    let minutes = minutes?;
    let seconds = seconds.unwrap_or(0.0);
    let decimal = degrees as f64 + minutes as f64 / 60.0 + seconds / 3600.0;
    match direction.map(|d| d.trim().to_uppercase()) {
        Some(d) if d == "S" || d == "W" => Some(-decimal),
        _ => Some(decimal),
    }
}

/// The license header slice of a detail report
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LicenseSummary {
    pub unique_system_identifier: Option<String>,
    pub call_sign: Option<String>,
    pub license_status: Option<String>,
    pub radio_service_type: Option<String>,
    pub grant_date: Option<String>,
    pub expired_date: Option<String>,
    pub uls_file_number: Option<String>,
}

impl LicenseSummary {
    pub fn status_text(&self) -> String {
        self.license_status
            .as_deref()
            .map(status_text)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// The licensee slice of a detail report
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LicenseeSummary {
    pub entity_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub entity_type: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl LicenseeSummary {
    /// Organization name, or first/last name joined, whichever exists
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.entity_name.as_deref().filter(|n| !n.is_empty()) {
            return Some(name.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FrequencySummary {
    pub frequency_assigned: Option<f64>,
    pub emission_designator: Option<String>,
    pub power_output: Option<f64>,
    pub power_erp: Option<f64>,
    pub status_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LocationSummary {
    pub location_number: Option<i64>,
    pub location_address: Option<String>,
    pub location_city: Option<String>,
    pub location_county: Option<String>,
    pub location_state: Option<String>,
    pub lat_degrees: Option<i64>,
    pub lat_minutes: Option<i64>,
    pub lat_seconds: Option<f64>,
    pub lat_direction: Option<String>,
    pub long_degrees: Option<i64>,
    pub long_minutes: Option<i64>,
    pub long_seconds: Option<f64>,
    pub long_direction: Option<String>,
    pub ground_elevation: Option<f64>,
    pub height_of_support_structure: Option<f64>,
    pub overall_height_of_structure: Option<f64>,
}

impl LocationSummary {
    /// Decimal (latitude, longitude), when enough pieces are present
    pub fn decimal_coordinates(&self) -> Option<(f64, f64)> {
        let lat = dms_to_decimal(
            self.lat_degrees,
            self.lat_minutes,
            self.lat_seconds,
            self.lat_direction.as_deref(),
        )?;
        let long = dms_to_decimal(
            self.long_degrees,
            self.long_minutes,
            self.long_seconds,
            self.long_direction.as_deref(),
        )?;
        Some((lat, long))
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AntennaSummary {
    pub antenna_number: Option<i64>,
    pub location_number: Option<i64>,
    pub antenna_make: Option<String>,
    pub antenna_model: Option<String>,
    pub height_to_tip: Option<f64>,
    pub gain: Option<f64>,
    pub azimuth: Option<f64>,
    pub polarization_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PurposeSummary {
    pub purpose_code: Option<String>,
    pub status_code: Option<String>,
    pub status_date: Option<String>,
}

/// Everything known about one call sign
#[derive(Debug, Clone, Serialize)]
pub struct CallsignDetail {
    pub license: LicenseSummary,
    pub licensee: Option<LicenseeSummary>,
    pub frequencies: Vec<FrequencySummary>,
    pub locations: Vec<LocationSummary>,
    pub antennas: Vec<AntennaSummary>,
    pub purposes: Vec<PurposeSummary>,
}

/// Read-only detail reader over the six entity tables
pub struct CallsignLookup {
    db: SqlitePool,
}

impl CallsignLookup {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Full detail for one call sign, or None when no license row matches.
    ///
    /// When several license rows share the call sign, the most complete
    /// one wins: status plus dates beats status alone beats neither.
    pub async fn lookup(&self, call_sign: &str) -> Result<Option<CallsignDetail>> {
        let call_sign = call_sign.trim().to_uppercase();

        let license: Option<LicenseSummary> = sqlx::query_as(
            r#"
            SELECT unique_system_identifier, call_sign, license_status,
                   radio_service_type, grant_date, expired_date, uls_file_number
            FROM licenses
            WHERE call_sign = ?
            ORDER BY
                CASE
                    WHEN license_status IS NOT NULL AND license_status != ''
                         AND grant_date IS NOT NULL AND grant_date != '' THEN 1
                    WHEN license_status IS NOT NULL AND license_status != '' THEN 2
                    ELSE 3
                END,
                expired_date DESC
            LIMIT 1
            "#,
        )
        .bind(&call_sign)
        .fetch_optional(&self.db)
        .await?;

        let Some(license) = license else {
            return Ok(None);
        };

        let licensee: Option<LicenseeSummary> = sqlx::query_as(
            r#"
            SELECT entity_name, first_name, last_name, entity_type, street_address,
                   city, state, zip_code, phone, email
            FROM entities
            WHERE call_sign = ? OR uls_file_number = ?
            LIMIT 1
            "#,
        )
        .bind(&call_sign)
        .bind(&license.uls_file_number)
        .fetch_optional(&self.db)
        .await?;

        let frequencies: Vec<FrequencySummary> = sqlx::query_as(
            r#"
            SELECT frequency_assigned, emission_designator, power_output, power_erp, status_code
            FROM frequencies
            WHERE call_sign = ?
            ORDER BY frequency_assigned
            "#,
        )
        .bind(&call_sign)
        .fetch_all(&self.db)
        .await?;

        let locations: Vec<LocationSummary> = sqlx::query_as(
            r#"
            SELECT location_number, location_address, location_city, location_county,
                   location_state, lat_degrees, lat_minutes, lat_seconds, lat_direction,
                   long_degrees, long_minutes, long_seconds, long_direction,
                   ground_elevation, height_of_support_structure, overall_height_of_structure
            FROM locations
            WHERE call_sign = ?
            ORDER BY location_number
            "#,
        )
        .bind(&call_sign)
        .fetch_all(&self.db)
        .await?;

        let antennas: Vec<AntennaSummary> = sqlx::query_as(
            r#"
            SELECT antenna_number, location_number, antenna_make, antenna_model,
                   height_to_tip, gain, azimuth, polarization_code
            FROM antennas
            WHERE call_sign = ?
            ORDER BY antenna_number
            "#,
        )
        .bind(&call_sign)
        .fetch_all(&self.db)
        .await?;

        let purposes: Vec<PurposeSummary> = sqlx::query_as(
            r#"
            SELECT purpose_code, status_code, status_date
            FROM application_purpose
            WHERE call_sign = ?
            "#,
        )
        .bind(&call_sign)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(CallsignDetail {
            license,
            licensee,
            frequencies,
            locations,
            antennas,
            purposes,
        }))
    }

    /// Call signs resembling a fragment, for miss suggestions
    pub async fn similar(&self, fragment: &str, limit: i64) -> Result<Vec<String>> {
        let pattern = format!("%{}%", fragment.trim().to_uppercase());
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT call_sign FROM entities \
             WHERE call_sign LIKE ? AND call_sign IS NOT NULL LIMIT ?",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|(cs,)| cs).collect())
    }
}
