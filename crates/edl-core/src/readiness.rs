//! # Readiness Evaluation
//!
//! Readiness is a derived view over an entity's observable state, never a
//! stored field. Recomputing on every read means it cannot go stale when
//! evidence is quarantined or a conflict is resolved.
//!
//! ## Rule Order
//!
//! First match wins:
//!
//! 1. Quarantined evidence or open conflicts  -> `NOT_READY`
//! 2. Mapping not confirmed                   -> `PENDING_MATCH`
//! 3. Required fields missing                 -> `READY_WITH_GAPS`
//! 4. Otherwise                               -> `READY`
//!
//! Blocking problems outrank mapping gaps: an entity with an open
//! conflict reads `NOT_READY` even when it is also unmapped.

use crate::taxonomy::{MappingStatus, Readiness};

/// Evaluate readiness from an entity's observable state.
pub fn readiness_of(
    mapping: MappingStatus,
    quarantined_evidence: u32,
    open_conflicts: u32,
    missing_fields: &[String],
) -> Readiness {
    if quarantined_evidence > 0 || open_conflicts > 0 {
        return Readiness::NotReady;
    }
    if mapping != MappingStatus::Mapped {
        return Readiness::PendingMatch;
    }
    if !missing_fields.is_empty() {
        return Readiness::ReadyWithGaps;
    }
    Readiness::Ready
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clean_mapped_entity_is_ready() {
        let r = readiness_of(MappingStatus::Mapped, 0, 0, &[]);
        assert_eq!(r, Readiness::Ready);
    }

    #[test]
    fn quarantined_evidence_blocks() {
        let r = readiness_of(MappingStatus::Mapped, 1, 0, &[]);
        assert_eq!(r, Readiness::NotReady);
    }

    #[test]
    fn open_conflict_blocks() {
        let r = readiness_of(MappingStatus::Mapped, 0, 2, &[]);
        assert_eq!(r, Readiness::NotReady);
    }

    #[test]
    fn blocking_outranks_unmapped() {
        // Quarantine wins even when the entity is also unmapped with gaps.
        let missing = fields(&["tax_id", "country"]);
        let r = readiness_of(MappingStatus::Unmapped, 3, 1, &missing);
        assert_eq!(r, Readiness::NotReady);
    }

    #[test]
    fn unmapped_is_pending_match() {
        let r = readiness_of(MappingStatus::Unmapped, 0, 0, &[]);
        assert_eq!(r, Readiness::PendingMatch);
    }

    #[test]
    fn pending_suggestion_still_pending_match() {
        // A suggestion awaiting review does not count as mapped.
        let r = readiness_of(MappingStatus::Pending, 0, 0, &[]);
        assert_eq!(r, Readiness::PendingMatch);
    }

    #[test]
    fn unmapped_outranks_gaps() {
        let missing = fields(&["tax_id"]);
        let r = readiness_of(MappingStatus::Unmapped, 0, 0, &missing);
        assert_eq!(r, Readiness::PendingMatch);
    }

    #[test]
    fn mapped_with_gaps() {
        let missing = fields(&["hs_code"]);
        let r = readiness_of(MappingStatus::Mapped, 0, 0, &missing);
        assert_eq!(r, Readiness::ReadyWithGaps);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_mapping() -> impl Strategy<Value = MappingStatus> {
        prop_oneof![
            Just(MappingStatus::Unmapped),
            Just(MappingStatus::Pending),
            Just(MappingStatus::Mapped),
        ]
    }

    proptest! {
        /// Any blocking count forces NOT_READY regardless of other state.
        #[test]
        fn blocking_always_wins(
            mapping in any_mapping(),
            quarantined in 1u32..100,
            conflicts in 0u32..100,
            missing in prop::collection::vec("[a-z_]{1,12}", 0..5),
        ) {
            prop_assert_eq!(
                readiness_of(mapping, quarantined, conflicts, &missing),
                Readiness::NotReady
            );
        }

        /// With nothing blocking, readiness depends only on mapping and
        /// gaps.
        #[test]
        fn unblocked_depends_on_mapping(
            mapping in any_mapping(),
            missing in prop::collection::vec("[a-z_]{1,12}", 0..5),
        ) {
            let r = readiness_of(mapping, 0, 0, &missing);
            match (mapping, missing.is_empty()) {
                (MappingStatus::Mapped, true) => prop_assert_eq!(r, Readiness::Ready),
                (MappingStatus::Mapped, false) => {
                    prop_assert_eq!(r, Readiness::ReadyWithGaps)
                }
                _ => prop_assert_eq!(r, Readiness::PendingMatch),
            }
        }
    }
}
