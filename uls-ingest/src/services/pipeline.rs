//! Pipeline orchestrator
//!
//! Sequences Transport → Expander → Parser → Store across the two source
//! datasets and records exactly one history row per run. Dataset-level
//! failures (download, expansion) are absorbed: the other dataset is still
//! attempted. Store-level failures end the run early but are caught here,
//! recorded in history, and surfaced only as a false success flag.

use crate::db;
use crate::models::{
    IngestRun, PipelineState, RecordKind, RunSummary, SourceKind, DATASET_ORDER,
};
use crate::services::archive;
use crate::services::downloader::{DatasetInfo, Downloader, TransportError};
use crate::services::parser::RecordParser;
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;
use uls_common::{Config, Error, Result};
use walkdir::WalkDir;

/// Per-dataset contribution to one run
#[derive(Debug, Clone, Copy, Default)]
struct DatasetOutcome {
    fetched: bool,
    bytes: u64,
    records: u64,
}

/// Orchestrates one ingest run end to end
pub struct Pipeline {
    db: SqlitePool,
    downloader: Downloader,
    parser: RecordParser,
    config: Config,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(db: SqlitePool, config: Config) -> Result<Self> {
        let downloader = Downloader::from_config(&config)
            .map_err(|e| Error::Internal(format!("Cannot build downloader: {}", e)))?;

        Ok(Self {
            parser: RecordParser::new(db.clone()),
            db,
            downloader,
            config,
            state: PipelineState::Idle,
        })
    }

    fn transition_to(&mut self, new_state: PipelineState) {
        tracing::debug!("Pipeline state: {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
    }

    /// Execute one full run: both datasets in fixed order, then one
    /// history row. Never panics or returns an error to the caller; the
    /// summary's success flag is the only failure signal.
    pub async fn run(&mut self) -> RunSummary {
        let mut run = IngestRun::new("LM");
        let mut bytes_fetched = 0u64;
        let mut records_processed = 0u64;
        let mut datasets_fetched = 0usize;

        tracing::info!("Starting ingest run {}", run.id);

        // License data is stored before application data so the merge
        // policy's precedence assumption always holds.
        for source in DATASET_ORDER {
            match self.ingest_dataset(source).await {
                Ok(outcome) => {
                    bytes_fetched += outcome.bytes;
                    records_processed += outcome.records;
                    if outcome.fetched {
                        datasets_fetched += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Run-level error while processing {}: {}", source, e);
                    run.success = false;
                    run.error_message = Some(e.to_string());
                    break;
                }
            }
        }

        self.transition_to(PipelineState::RecordingHistory);
        run.run_date = Utc::now();
        run.bytes_fetched = bytes_fetched as i64;
        run.records_processed = records_processed as i64;

        if let Err(e) = db::append_run(&self.db, &run).await {
            tracing::error!("Failed to record run history: {}", e);
            run.success = false;
        }

        let summary = RunSummary {
            run_id: run.id,
            bytes_fetched,
            records_processed,
            datasets_fetched,
            datasets_attempted: DATASET_ORDER.len(),
            success: run.success,
        };

        if summary.obtained_no_data() {
            tracing::warn!(
                "Run completed but no records were obtained from any dataset; \
                 this may indicate an upstream outage or a file format change"
            );
        }

        tracing::info!(
            "Ingest run {} finished: {} bytes, {} records, success={}",
            summary.run_id,
            summary.bytes_fetched,
            summary.records_processed,
            summary.success
        );

        self.transition_to(PipelineState::Idle);
        summary
    }

    /// Fetch, expand, and process one dataset. Transport and expansion
    /// failures abort only this dataset's contribution (Ok with zero
    /// records); store failures propagate.
    async fn ingest_dataset(&mut self, source: SourceKind) -> Result<DatasetOutcome> {
        let url = match source {
            SourceKind::Licenses => self.config.license_url.clone(),
            SourceKind::Applications => self.config.application_url.clone(),
        };

        self.transition_to(PipelineState::Fetching(source));
        let archive_name = format!("LM_{}_{}.zip", source.label(), Utc::now().format("%Y%m%d"));
        let download = match self.downloader.fetch(&url, &archive_name).await {
            Ok(download) => download,
            Err(e) => {
                tracing::warn!("Dataset {} unavailable: {}", source, e);
                return Ok(DatasetOutcome::default());
            }
        };

        self.transition_to(PipelineState::Expanding(source));
        let workdir = match archive::expand(&download.path) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!("Cannot expand {} archive: {}", source, e);
                return Ok(DatasetOutcome {
                    fetched: true,
                    bytes: download.bytes,
                    records: 0,
                });
            }
        };

        self.transition_to(PipelineState::Processing(source));
        let records = self.process_directory(&workdir, source).await?;

        Ok(DatasetOutcome {
            fetched: true,
            bytes: download.bytes,
            records,
        })
    }

    /// Dispatch every `.dat` file in a working directory to the parser by
    /// its two-letter name prefix. Unrecognized prefixes are ignored.
    /// Returns the number of records accepted across all files.
    pub async fn process_directory(&self, dir: &Path, source: SourceKind) -> Result<u64> {
        let mut total = 0u64;

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.to_lowercase().ends_with(".dat") {
                continue;
            }

            let prefix: String = name.to_uppercase().chars().take(2).collect();
            let Some(kind) = RecordKind::from_file_prefix(&prefix) else {
                tracing::debug!("Ignoring file with unrecognized prefix: {}", name);
                continue;
            };

            match self.parser.process_file(entry.path(), kind, source).await {
                Ok(counts) => {
                    total += counts.accepted;
                    tracing::info!(
                        "Processed {} records from {} into {} table",
                        counts.accepted,
                        name,
                        kind.table_name()
                    );
                }
                // Store connectivity/schema problems end the run
                Err(Error::Database(e)) => return Err(Error::Database(e)),
                // Anything else (unreadable file etc.) is contained here
                Err(e) => {
                    tracing::error!("Error processing file {}: {}", name, e);
                }
            }
        }

        Ok(total)
    }

    /// Re-process already extracted working directories without
    /// downloading. License-sourced directories go first, matching the
    /// order a full run would use.
    pub async fn process_existing(&self) -> Result<u64> {
        let download_dir = self.config.download_path();
        if !download_dir.exists() {
            return Err(Error::NotFound(format!(
                "No download area at {}",
                download_dir.display()
            )));
        }

        let mut workdirs: Vec<(SourceKind, std::path::PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&download_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_dir() || !name.starts_with("extracted_") {
                continue;
            }
            let source = if name.to_lowercase().contains("licenses") {
                SourceKind::Licenses
            } else {
                SourceKind::Applications
            };
            workdirs.push((source, path));
        }

        if workdirs.is_empty() {
            return Err(Error::NotFound(
                "No extracted working directories found; run a full ingest first".to_string(),
            ));
        }

        let mut total = 0u64;
        for wanted in DATASET_ORDER {
            for (source, path) in workdirs.iter().filter(|(s, _)| *s == wanted) {
                tracing::info!("Processing existing directory {}", path.display());
                total += self.process_directory(path, *source).await?;
            }
        }
        Ok(total)
    }

    /// HEAD probe of both dataset URLs
    pub async fn dataset_info(
        &self,
    ) -> Vec<(SourceKind, std::result::Result<DatasetInfo, TransportError>)> {
        let mut results = Vec::new();
        for source in DATASET_ORDER {
            let url = match source {
                SourceKind::Licenses => &self.config.license_url,
                SourceKind::Applications => &self.config.application_url,
            };
            results.push((source, self.downloader.probe(url).await));
        }
        results
    }

    /// Remove downloads older than the configured retention window
    pub fn cleanup_downloads(&self) -> std::io::Result<()> {
        let report = self
            .downloader
            .cleanup_old_downloads(self.config.download_retention_days)?;
        if report.items_removed == 0 {
            tracing::info!("Nothing to clean up");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn setup(dir: &tempfile::TempDir) -> (SqlitePool, Pipeline) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        uls_common::db::create_schema(&pool).await.unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let pipeline = Pipeline::new(pool.clone(), config).unwrap();
        (pool, pipeline)
    }

    fn hd_line(usi: &str) -> String {
        let mut fields = vec![String::new(); 59];
        fields[0] = "HD".to_string();
        fields[1] = usi.to_string();
        fields[4] = "WQAB123".to_string();
        fields[5] = "A".to_string();
        fields.join("|")
    }

    fn en_line(usi: &str) -> String {
        let mut fields = vec![String::new(); 30];
        fields[0] = "EN".to_string();
        fields[1] = usi.to_string();
        fields[4] = "WQAB123".to_string();
        fields[7] = "Example Communications".to_string();
        fields.join("|")
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write!(file, "{}", contents).unwrap();
    }

    #[tokio::test]
    async fn directory_dispatch_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let (pool, pipeline) = setup(&dir).await;

        let workdir = dir.path().join("extracted_LM_licenses_test");
        std::fs::create_dir_all(&workdir).unwrap();
        write_file(&workdir, "HD.dat", &format!("{}\n", hd_line("1001")));
        write_file(&workdir, "EN.dat", &format!("{}\n", en_line("1001")));
        write_file(&workdir, "ZZ.dat", "ZZ|garbage|fields\n");
        write_file(&workdir, "counts.txt", "not a data file\n");

        let total = pipeline
            .process_directory(&workdir, SourceKind::Licenses)
            .await
            .unwrap();
        assert_eq!(total, 2);

        let licenses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM licenses")
            .fetch_one(&pool)
            .await
            .unwrap();
        let entities: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entities")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(licenses, 1);
        assert_eq!(entities, 1);
    }

    #[tokio::test]
    async fn reprocessing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (pool, pipeline) = setup(&dir).await;

        let workdir = dir.path().join("extracted_LM_licenses_test");
        std::fs::create_dir_all(&workdir).unwrap();
        write_file(
            &workdir,
            "HD.dat",
            &format!("{}\n{}\n", hd_line("1001"), hd_line("1002")),
        );

        let first = pipeline
            .process_directory(&workdir, SourceKind::Licenses)
            .await
            .unwrap();
        let second = pipeline
            .process_directory(&workdir, SourceKind::Licenses)
            .await
            .unwrap();
        assert_eq!(first, second);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM licenses")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn process_existing_orders_licenses_first() {
        let dir = tempfile::tempdir().unwrap();
        let (pool, pipeline) = setup(&dir).await;

        let downloads = dir.path().join("downloads");
        let lic_dir = downloads.join("extracted_LM_licenses_20240101");
        let app_dir = downloads.join("extracted_LM_applications_20240101");
        std::fs::create_dir_all(&lic_dir).unwrap();
        std::fs::create_dir_all(&app_dir).unwrap();

        // The application record is dateless and the license record is
        // settled: correct ordering leaves the license row untouched.
        let mut lic_fields = vec![String::new(); 59];
        lic_fields[0] = "HD".to_string();
        lic_fields[1] = "1001".to_string();
        lic_fields[4] = "WQAB123".to_string();
        lic_fields[5] = "ACTIVE".to_string();
        lic_fields[7] = "20200101".to_string();
        lic_fields[8] = "20300101".to_string();
        write_file(&lic_dir, "HD.dat", &format!("{}\n", lic_fields.join("|")));

        let mut app_fields = vec![String::new(); 59];
        app_fields[0] = "HD".to_string();
        app_fields[1] = "1001".to_string();
        app_fields[4] = "INTRUDER".to_string();
        write_file(&app_dir, "HD.dat", &format!("{}\n", app_fields.join("|")));

        let total = pipeline.process_existing().await.unwrap();
        assert_eq!(total, 1);

        let call_sign: String = sqlx::query_scalar(
            "SELECT call_sign FROM licenses WHERE unique_system_identifier = '1001'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(call_sign, "WQAB123");
    }
}
