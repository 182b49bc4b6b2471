//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the schema. Schema
//! creation is idempotent: every statement is `IF NOT EXISTS`, so calling
//! it against an existing, populated store is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed.
///
/// The pipeline is single-writer by design: one run, one sequence of
/// per-file units of work. The pool is capped at one connection so that
/// uniqueness constraints can never race between concurrent writers.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps readers (stats, lookup) usable while a run is writing
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_licenses_table(pool).await?;
    create_entities_table(pool).await?;
    create_frequencies_table(pool).await?;
    create_locations_table(pool).await?;
    create_antennas_table(pool).await?;
    create_application_purpose_table(pool).await?;
    create_ingest_runs_table(pool).await?;

    info!("Database schema ready");
    Ok(())
}

/// Create the licenses table (authorization header records)
///
/// One row per unique system identifier; replaced in place per the merge
/// policy in the parser.
async fn create_licenses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS licenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT UNIQUE,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            license_status TEXT,
            radio_service_type TEXT,
            grant_date TEXT,
            expired_date TEXT,
            cancellation_date TEXT,
            eligibility_rule_num TEXT,
            applicant_type_code TEXT,
            alien TEXT,
            alien_government TEXT,
            alien_corporation TEXT,
            alien_officer TEXT,
            alien_control TEXT,
            revoked TEXT,
            convicted TEXT,
            adjudged TEXT,
            involved_reserved TEXT,
            common_carrier TEXT,
            non_common_carrier TEXT,
            private_comm TEXT,
            fixed TEXT,
            mobile TEXT,
            radiolocation TEXT,
            satellite TEXT,
            developmental_or_sta TEXT,
            interconnected_service TEXT,
            certifier_first_name TEXT,
            certifier_mi TEXT,
            certifier_last_name TEXT,
            certifier_suffix TEXT,
            certifier_title TEXT,
            gender TEXT,
            african_american TEXT,
            native_american TEXT,
            hawaiian TEXT,
            asian TEXT,
            white TEXT,
            ethnicity TEXT,
            effective_date TEXT,
            last_action_date TEXT,
            auction_id TEXT,
            reg_stat_broad_serv TEXT,
            band_manager TEXT,
            type_serv_broad_serv TEXT,
            alien_ruling TEXT,
            licensee_name_change TEXT,
            whitespace_ind TEXT,
            additional_cert_choice TEXT,
            additional_cert_answer TEXT,
            discontinuation_ind TEXT,
            regulatory_compliance_ind TEXT,
            eligibility_cert_900 TEXT,
            transition_plan_cert_900 TEXT,
            return_spectrum_cert_900 TEXT,
            payment_cert_900 TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_licenses_call_sign ON licenses(call_sign)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the entities table (names/addresses/roles attached to a license)
async fn create_entities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT UNIQUE,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            entity_type TEXT,
            licensee_id TEXT,
            entity_name TEXT,
            first_name TEXT,
            mi TEXT,
            last_name TEXT,
            suffix TEXT,
            phone TEXT,
            fax TEXT,
            email TEXT,
            street_address TEXT,
            city TEXT,
            state TEXT,
            zip_code TEXT,
            po_box TEXT,
            attention_line TEXT,
            sgin TEXT,
            frn TEXT,
            applicant_type_code TEXT,
            applicant_type_other TEXT,
            status_code TEXT,
            status_date TEXT,
            lic_category_code TEXT,
            linked_license_id TEXT,
            linked_callsign TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_entities_unique ON entities(unique_system_identifier)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_call_sign ON entities(call_sign)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_name ON entities(entity_name)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the frequencies table (one row per frequency assignment)
async fn create_frequencies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS frequencies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            frequency_assigned REAL,
            frequency_upper_band REAL,
            frequency_carrier REAL,
            frequency_offset REAL,
            emission_designator TEXT,
            power_output REAL,
            power_erp REAL,
            tolerance REAL,
            frequency_number INTEGER,
            frequency_seq_id INTEGER,
            status_code TEXT,
            status_date TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(unique_system_identifier, frequency_number, frequency_seq_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_frequencies_unique ON frequencies(unique_system_identifier, frequency_number, frequency_seq_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_frequencies_call_sign ON frequencies(call_sign)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_frequencies_assigned ON frequencies(frequency_assigned)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the locations table (sites; coordinates stay disaggregated)
async fn create_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            location_action_performed TEXT,
            location_type_code TEXT,
            location_class_code TEXT,
            location_number INTEGER,
            site_status TEXT,
            corresponding_fixed_location INTEGER,
            location_address TEXT,
            location_city TEXT,
            location_county TEXT,
            location_state TEXT,
            radius_of_operation REAL,
            area_of_operation_code TEXT,
            clearance_indicator TEXT,
            ground_elevation REAL,
            lat_degrees INTEGER,
            lat_minutes INTEGER,
            lat_seconds REAL,
            lat_direction TEXT,
            long_degrees INTEGER,
            long_minutes INTEGER,
            long_seconds REAL,
            long_direction TEXT,
            max_lat_degrees INTEGER,
            max_lat_minutes INTEGER,
            max_lat_seconds REAL,
            max_lat_direction TEXT,
            max_long_degrees INTEGER,
            max_long_minutes INTEGER,
            max_long_seconds REAL,
            max_long_direction TEXT,
            nepa TEXT,
            quiet_zone_notification_date TEXT,
            tower_registration_number TEXT,
            height_of_support_structure REAL,
            overall_height_of_structure REAL,
            structure_type TEXT,
            airport_id TEXT,
            location_name TEXT,
            units_hand_held TEXT,
            units_mobile TEXT,
            units_temp_fixed TEXT,
            units_aircraft TEXT,
            units_itinerant TEXT,
            status_code TEXT,
            status_date TEXT,
            earth_station_agreement TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(unique_system_identifier, location_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_locations_unique ON locations(unique_system_identifier, location_number)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_locations_call_sign ON locations(call_sign)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the antennas table (antenna specifications at a location)
async fn create_antennas_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS antennas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            antenna_action_performed TEXT,
            antenna_number INTEGER,
            location_number INTEGER,
            receiver_number INTEGER,
            antenna_type_code TEXT,
            height_to_tip REAL,
            height_to_center_raat REAL,
            antenna_make TEXT,
            antenna_model TEXT,
            tilt_toward REAL,
            tilt_angle REAL,
            polarization_code TEXT,
            beamwidth_horiz REAL,
            beamwidth_vert REAL,
            gain REAL,
            azimuth REAL,
            height_above_avg_terrain REAL,
            diversity_height REAL,
            diversity_gain REAL,
            diversity_beam REAL,
            reflector_height REAL,
            reflector_width REAL,
            reflector_separation REAL,
            repeater_height REAL,
            repeater_width REAL,
            repeater_separation REAL,
            commanded_azimuth REAL,
            commanded_elevation REAL,
            twist REAL,
            settle_time REAL,
            comment_text TEXT,
            status_code TEXT,
            status_date TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(unique_system_identifier, antenna_number, location_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_antennas_unique ON antennas(unique_system_identifier, antenna_number, location_number)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the application purpose table (filing purpose codes)
async fn create_application_purpose_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_purpose (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_system_identifier TEXT,
            uls_file_number TEXT,
            ebf_number TEXT,
            call_sign TEXT,
            purpose_code TEXT,
            status_code TEXT,
            status_date TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(unique_system_identifier, purpose_code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_application_purpose_unique ON application_purpose(unique_system_identifier, purpose_code)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the run-history ledger (append-only)
async fn create_ingest_runs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ingest_runs (
            id TEXT PRIMARY KEY,
            run_date TEXT NOT NULL,
            dataset TEXT NOT NULL,
            bytes_fetched INTEGER NOT NULL DEFAULT 0,
            records_processed INTEGER NOT NULL DEFAULT 0,
            success INTEGER NOT NULL,
            error_message TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingest_runs_date ON ingest_runs(run_date)")
        .execute(pool)
        .await?;

    Ok(())
}
