//! Flat-file record parser
//!
//! Interprets each line of a pipe-delimited flat file as one record of a
//! given kind and persists it through the store. Parser and store are
//! co-designed: the merge policy decides per record whether an upsert is
//! issued at all. One file is one transaction; a crash mid-run keeps
//! previously committed files intact.

use crate::db::{antennas, entities, frequencies, licenses, locations, purposes};
use crate::models::{
    AntennaRecord, EntityRecord, FileCounts, FrequencyRecord, LicenseRecord, LocationRecord,
    PurposeRecord, RecordKind, RecordOutcome, SourceKind,
};
use crate::services::merge::{self, MergeDecision};
use sqlx::{SqliteConnection, SqlitePool};
use std::io::{BufRead, BufReader};
use std::path::Path;
use uls_common::Result;

/// Parses flat files and persists their records
pub struct RecordParser {
    db: SqlitePool,
}

impl RecordParser {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Process one flat file of the given kind from the given source.
    ///
    /// Lines below the kind's minimum field count are skipped silently;
    /// single-record persistence failures are logged and skipped. Neither
    /// aborts the file. Returns per-outcome counts for the whole file.
    pub async fn process_file(
        &self,
        path: &Path,
        kind: RecordKind,
        source: SourceKind,
    ) -> Result<FileCounts> {
        let file = std::fs::File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut tx = self.db.begin().await?;
        let mut counts = FileCounts::default();

        // Export files occasionally carry non-UTF-8 bytes; decode lossily
        // instead of failing the file.
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('|').collect();
            let outcome = Self::process_line(&mut tx, &fields, kind, source).await;

            match &outcome {
                RecordOutcome::Accepted => {}
                RecordOutcome::Skipped(reason) => {
                    tracing::debug!(kind = %kind, reason = ?reason, "Record skipped");
                }
                RecordOutcome::Failed(message) => {
                    tracing::warn!(
                        kind = %kind,
                        file = %path.display(),
                        "Error storing record: {}",
                        message
                    );
                }
            }
            counts.record(&outcome);
        }

        tx.commit().await?;

        tracing::info!(
            "Processed {} records from {} ({} skipped, {} failed)",
            counts.accepted,
            path.display(),
            counts.skipped,
            counts.failed
        );

        Ok(counts)
    }

    async fn process_line(
        conn: &mut SqliteConnection,
        fields: &[&str],
        kind: RecordKind,
        source: SourceKind,
    ) -> RecordOutcome {
        match kind {
            RecordKind::License => Self::process_license(conn, fields, source).await,
            RecordKind::Entity => Self::process_entity(conn, fields).await,
            RecordKind::Frequency => match FrequencyRecord::from_fields(fields, source) {
                Ok(record) => store_outcome(frequencies::upsert(conn, &record).await),
                Err(reason) => RecordOutcome::Skipped(reason),
            },
            RecordKind::Location => match LocationRecord::from_fields(fields) {
                Ok(record) => store_outcome(locations::upsert(conn, &record).await),
                Err(reason) => RecordOutcome::Skipped(reason),
            },
            RecordKind::Antenna => match AntennaRecord::from_fields(fields) {
                Ok(record) => store_outcome(antennas::upsert(conn, &record).await),
                Err(reason) => RecordOutcome::Skipped(reason),
            },
            RecordKind::Purpose => match PurposeRecord::from_fields(fields) {
                Ok(record) => store_outcome(purposes::upsert(conn, &record).await),
                Err(reason) => RecordOutcome::Skipped(reason),
            },
        }
    }

    /// License records carry the cross-source precedence policy: an
    /// application-sourced record consults the existing row first.
    async fn process_license(
        conn: &mut SqliteConnection,
        fields: &[&str],
        source: SourceKind,
    ) -> RecordOutcome {
        let record = match LicenseRecord::from_fields(fields) {
            Ok(record) => record,
            Err(reason) => return RecordOutcome::Skipped(reason),
        };

        let existing = if source == SourceKind::Applications {
            match licenses::load_existing(conn, &record.unique_system_identifier).await {
                Ok(existing) => existing,
                Err(e) => return RecordOutcome::Failed(e.to_string()),
            }
        } else {
            None
        };

        match merge::license_decision(source, existing.as_ref(), &record) {
            MergeDecision::Skip(reason) => RecordOutcome::Skipped(reason),
            MergeDecision::Upsert => store_outcome(licenses::upsert(conn, &record).await),
        }
    }

    /// Entity records protect an already-attached call sign.
    async fn process_entity(conn: &mut SqliteConnection, fields: &[&str]) -> RecordOutcome {
        let record = match EntityRecord::from_fields(fields) {
            Ok(record) => record,
            Err(reason) => return RecordOutcome::Skipped(reason),
        };

        // Only consult the store when the incoming record could conflict
        let existing = if record.call_sign.is_some() {
            match entities::load_call_sign(conn, &record.unique_system_identifier).await {
                Ok(existing) => existing,
                Err(e) => return RecordOutcome::Failed(e.to_string()),
            }
        } else {
            None
        };

        let existing_view = existing.as_ref().map(|cs| cs.as_deref());
        match merge::entity_decision(existing_view, &record) {
            MergeDecision::Skip(reason) => RecordOutcome::Skipped(reason),
            MergeDecision::Upsert => store_outcome(entities::upsert(conn, &record).await),
        }
    }
}

fn store_outcome(result: Result<()>) -> RecordOutcome {
    match result {
        Ok(()) => RecordOutcome::Accepted,
        Err(e) => RecordOutcome::Failed(e.to_string()),
    }
}
