//! uls-ingest library interface
//!
//! Fetch-normalize-merge pipeline for the bulk license-registry exports,
//! plus the read-only collaborator surfaces (statistics, call-sign detail,
//! fuzzy search, text index). The binary in `main.rs` is a thin CLI over
//! these modules.

pub mod db;
pub mod models;
pub mod services;

pub use models::{RecordKind, RunSummary, SourceKind};
pub use services::Pipeline;
