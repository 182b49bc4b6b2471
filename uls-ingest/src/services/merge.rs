//! Conflict-resolution policy for incoming records
//!
//! Pure decision functions: the parser loads whatever existing state the
//! policy needs, asks for a decision, then issues (or withholds) the
//! upsert. Keeping the policy side-effect free makes every branch
//! assertable in tests.
//!
//! The license rule assumes the license dataset was processed before the
//! application dataset; the orchestrator enforces that ordering via
//! `DATASET_ORDER`.

use crate::db::ExistingLicense;
use crate::models::{EntityRecord, LicenseRecord, SkipReason, SourceKind};

/// Statuses settled enough to resist being overwritten by sparser data
pub const SETTLED_STATUSES: [&str; 3] = ["ACTIVE", "GRANTED", "LICENSED"];

/// What to do with an incoming record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Insert or fully replace the row
    Upsert,
    /// Leave the existing row untouched
    Skip(SkipReason),
}

/// Decide whether an incoming license record may be stored.
///
/// Records from the license dataset always win. A record from the
/// application dataset is skipped only when all three hold: the existing
/// row's status is settled, the existing row carries both grant and
/// expiration dates, and the incoming record carries neither. In every
/// other case the incoming record overwrites (last write wins).
pub fn license_decision(
    source: SourceKind,
    existing: Option<&ExistingLicense>,
    incoming: &LicenseRecord,
) -> MergeDecision {
    if source == SourceKind::Licenses {
        return MergeDecision::Upsert;
    }

    let Some(existing) = existing else {
        return MergeDecision::Upsert;
    };

    if is_settled(existing.license_status.as_deref())
        && existing.has_both_dates()
        && incoming.has_no_dates()
    {
        MergeDecision::Skip(SkipReason::SettledLicense)
    } else {
        MergeDecision::Upsert
    }
}

/// Decide whether an incoming entity record may be stored.
///
/// A record without a call sign cannot be attributed and is discarded.
/// A record whose call sign differs from the one already attached to the
/// identifier is discarded, protecting the earlier attachment from an
/// unrelated record sharing the identifier.
///
/// `existing_call_sign`: outer None means no row exists; inner None means
/// a row exists without a call sign.
pub fn entity_decision(
    existing_call_sign: Option<Option<&str>>,
    incoming: &EntityRecord,
) -> MergeDecision {
    let Some(incoming_call_sign) = incoming.call_sign.as_deref() else {
        return MergeDecision::Skip(SkipReason::BlankCallSign);
    };

    match existing_call_sign {
        Some(Some(existing)) if existing != incoming_call_sign => {
            MergeDecision::Skip(SkipReason::CallSignConflict)
        }
        _ => MergeDecision::Upsert,
    }
}

fn is_settled(status: Option<&str>) -> bool {
    status.is_some_and(|s| {
        let upper = s.trim().to_uppercase();
        SETTLED_STATUSES.contains(&upper.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_existing() -> ExistingLicense {
        ExistingLicense {
            license_status: Some("ACTIVE".to_string()),
            grant_date: Some("20200101".to_string()),
            expired_date: Some("20300101".to_string()),
        }
    }

    fn dateless_incoming() -> LicenseRecord {
        LicenseRecord {
            unique_system_identifier: "1001".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn license_source_always_overwrites() {
        let existing = settled_existing();
        let decision =
            license_decision(SourceKind::Licenses, Some(&existing), &dateless_incoming());
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn settled_row_resists_dateless_application_record() {
        let existing = settled_existing();
        let decision =
            license_decision(SourceKind::Applications, Some(&existing), &dateless_incoming());
        assert_eq!(decision, MergeDecision::Skip(SkipReason::SettledLicense));
    }

    #[test]
    fn application_record_with_grant_date_overwrites() {
        let existing = settled_existing();
        let mut incoming = dateless_incoming();
        incoming.grant_date = Some("20240601".to_string());
        let decision = license_decision(SourceKind::Applications, Some(&existing), &incoming);
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn unsettled_status_does_not_resist() {
        let mut existing = settled_existing();
        existing.license_status = Some("P".to_string());
        let decision =
            license_decision(SourceKind::Applications, Some(&existing), &dateless_incoming());
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn settled_status_matches_case_insensitively() {
        let mut existing = settled_existing();
        existing.license_status = Some("granted".to_string());
        let decision =
            license_decision(SourceKind::Applications, Some(&existing), &dateless_incoming());
        assert_eq!(decision, MergeDecision::Skip(SkipReason::SettledLicense));
    }

    #[test]
    fn missing_existing_dates_do_not_resist() {
        let mut existing = settled_existing();
        existing.expired_date = None;
        let decision =
            license_decision(SourceKind::Applications, Some(&existing), &dateless_incoming());
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn no_existing_row_means_insert() {
        let decision = license_decision(SourceKind::Applications, None, &dateless_incoming());
        assert_eq!(decision, MergeDecision::Upsert);
    }

    fn entity_with_call_sign(call_sign: Option<&str>) -> EntityRecord {
        EntityRecord {
            unique_system_identifier: "1001".to_string(),
            call_sign: call_sign.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn blank_call_sign_is_discarded() {
        let decision = entity_decision(None, &entity_with_call_sign(None));
        assert_eq!(decision, MergeDecision::Skip(SkipReason::BlankCallSign));
    }

    #[test]
    fn different_existing_call_sign_is_protected() {
        let decision = entity_decision(
            Some(Some("ABC123")),
            &entity_with_call_sign(Some("XYZ999")),
        );
        assert_eq!(decision, MergeDecision::Skip(SkipReason::CallSignConflict));
    }

    #[test]
    fn same_call_sign_updates() {
        let decision = entity_decision(
            Some(Some("ABC123")),
            &entity_with_call_sign(Some("ABC123")),
        );
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn existing_row_without_call_sign_is_replaceable() {
        let decision = entity_decision(Some(None), &entity_with_call_sign(Some("ABC123")));
        assert_eq!(decision, MergeDecision::Upsert);
    }

    #[test]
    fn no_existing_row_inserts() {
        let decision = entity_decision(None, &entity_with_call_sign(Some("ABC123")));
        assert_eq!(decision, MergeDecision::Upsert);
    }
}
