//! Source dataset and record kind tags
//!
//! Every flat file belongs to exactly one source dataset and carries
//! exactly one record kind. Both are explicit enums: field offsets and
//! merge precedence are selected by tag, never inferred mid-parse.

use serde::{Deserialize, Serialize};

/// Origin of a working directory's files.
///
/// The two bulk exports share record-kind prefixes but differ in field
/// layout (frequencies) and in merge priority (licenses win over
/// applications).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// Authoritative license snapshot
    Licenses,
    /// Application snapshot (lower merge priority)
    Applications,
}

/// Fixed processing order for one pipeline run.
///
/// The license merge policy assumes license records are stored before
/// application records are considered; the orchestrator iterates this
/// constant so callers cannot reorder the datasets.
pub const DATASET_ORDER: [SourceKind; 2] = [SourceKind::Licenses, SourceKind::Applications];

impl SourceKind {
    /// Short label used in archive names and log lines
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Licenses => "licenses",
            SourceKind::Applications => "applications",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the six flat-file record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// `HD` — authorization header (main license data)
    License,
    /// `EN` — licensee/contact/certifier name and address
    Entity,
    /// `FR` — frequency assignment
    Frequency,
    /// `LO` — site location
    Location,
    /// `AN` — antenna specification
    Antenna,
    /// `AP` — filing purpose code
    Purpose,
}

impl RecordKind {
    /// Map an upper-cased two-letter file name prefix to a record kind.
    ///
    /// Unrecognized prefixes yield None; the orchestrator ignores those
    /// files.
    pub fn from_file_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "HD" => Some(RecordKind::License),
            "EN" => Some(RecordKind::Entity),
            "FR" => Some(RecordKind::Frequency),
            "LO" => Some(RecordKind::Location),
            "AN" => Some(RecordKind::Antenna),
            "AP" => Some(RecordKind::Purpose),
            _ => None,
        }
    }

    /// Minimum raw field count (record-type tag included) for a line to be
    /// considered at all; shorter lines are skipped without error.
    pub fn min_fields(self) -> usize {
        match self {
            RecordKind::License => 59,
            RecordKind::Entity => 30,
            RecordKind::Frequency => 18,
            RecordKind::Location => 51,
            RecordKind::Antenna => 38,
            RecordKind::Purpose => 8,
        }
    }

    /// Target table name
    pub fn table_name(self) -> &'static str {
        match self {
            RecordKind::License => "licenses",
            RecordKind::Entity => "entities",
            RecordKind::Frequency => "frequencies",
            RecordKind::Location => "locations",
            RecordKind::Antenna => "antennas",
            RecordKind::Purpose => "application_purpose",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_mapping_covers_known_kinds() {
        assert_eq!(RecordKind::from_file_prefix("HD"), Some(RecordKind::License));
        assert_eq!(RecordKind::from_file_prefix("EN"), Some(RecordKind::Entity));
        assert_eq!(RecordKind::from_file_prefix("FR"), Some(RecordKind::Frequency));
        assert_eq!(RecordKind::from_file_prefix("LO"), Some(RecordKind::Location));
        assert_eq!(RecordKind::from_file_prefix("AN"), Some(RecordKind::Antenna));
        assert_eq!(RecordKind::from_file_prefix("AP"), Some(RecordKind::Purpose));
        assert_eq!(RecordKind::from_file_prefix("ZZ"), None);
    }

    #[test]
    fn licenses_processed_before_applications() {
        assert_eq!(DATASET_ORDER[0], SourceKind::Licenses);
        assert_eq!(DATASET_ORDER[1], SourceKind::Applications);
    }
}
