//! Pipeline run state machine and run-history records
//!
//! One run walks: Idle → (Fetching → Expanding → Processing) per dataset →
//! RecordingHistory → Idle. There is no failed state; dataset-level
//! failures are absorbed and the run always reaches RecordingHistory.

use super::SourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PipelineState {
    /// No run in progress (terminal)
    Idle,
    /// Downloading one dataset's archive
    Fetching(SourceKind),
    /// Unpacking one dataset's archive into its working directory
    Expanding(SourceKind),
    /// Parsing and storing one dataset's flat files
    Processing(SourceKind),
    /// Appending the single run-history row
    RecordingHistory,
}

/// One row of the append-only run-history ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRun {
    /// Surrogate run identifier
    pub id: Uuid,
    /// Run completion timestamp
    pub run_date: DateTime<Utc>,
    /// Dataset family label (both sources contribute to one row)
    pub dataset: String,
    /// Total archive bytes fetched across both sources
    pub bytes_fetched: i64,
    /// Total records stored across both sources
    pub records_processed: i64,
    /// False only when a run-level error was caught
    pub success: bool,
    /// Run-level error text, if any
    pub error_message: Option<String>,
}

impl IngestRun {
    pub fn new(dataset: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_date: Utc::now(),
            dataset: dataset.to_string(),
            bytes_fetched: 0,
            records_processed: 0,
            success: true,
            error_message: None,
        }
    }
}

/// What a completed run looked like, for callers and logs
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub bytes_fetched: u64,
    pub records_processed: u64,
    pub datasets_fetched: usize,
    pub datasets_attempted: usize,
    pub success: bool,
}

impl RunSummary {
    /// True when every fetch attempt failed and nothing was stored; the
    /// run still counts as completed, but callers should warn loudly.
    pub fn obtained_no_data(&self) -> bool {
        self.datasets_attempted > 0 && self.datasets_fetched == 0 && self.records_processed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_defaults_to_success_with_no_error() {
        let run = IngestRun::new("LM");
        assert!(run.success);
        assert!(run.error_message.is_none());
        assert_eq!(run.bytes_fetched, 0);
    }

    #[test]
    fn empty_run_is_flagged() {
        let summary = RunSummary {
            run_id: Uuid::new_v4(),
            bytes_fetched: 0,
            records_processed: 0,
            datasets_fetched: 0,
            datasets_attempted: 2,
            success: true,
        };
        assert!(summary.obtained_no_data());
    }
}
