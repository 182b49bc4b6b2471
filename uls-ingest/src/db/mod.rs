//! Store accessors for the ingest pipeline
//!
//! One upsert per record kind, keyed as described by the schema's unique
//! indexes, plus the run-history ledger and the statistics reader. Upserts
//! take a `&mut SqliteConnection` so a whole file is one unit of work:
//! the parser opens a transaction, streams records through it, commits.

pub mod antennas;
pub mod entities;
pub mod frequencies;
pub mod history;
pub mod licenses;
pub mod locations;
pub mod purposes;
pub mod stats;

pub use history::{append_run, last_run};
pub use licenses::ExistingLicense;
pub use stats::DatabaseStats;
