//! Data models for the ingest pipeline

pub mod kinds;
pub mod outcome;
pub mod records;
pub mod run;

pub use kinds::{RecordKind, SourceKind, DATASET_ORDER};
pub use outcome::{FileCounts, RecordOutcome, SkipReason};
pub use records::{
    AntennaRecord, EntityRecord, FrequencyRecord, LicenseRecord, LocationRecord, PurposeRecord,
};
pub use run::{IngestRun, PipelineState, RunSummary};
