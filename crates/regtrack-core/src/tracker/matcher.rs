//! Identity-key lookup of a regressed test among current ledger records.
//!
//! Matching goes by test ID, never test name: names change upstream and
//! matching on them would fork a regression's history on every rename.

use crate::types::{RegressionRecord, VariantSet};

/// True when `record` has the given release and test ID, and carries every
/// pair in `variants` with an equal value.
pub fn matches_regression(
    release: &str,
    test_id: &str,
    variants: &VariantSet,
    record: &RegressionRecord,
) -> bool {
    record.release == release && record.test_id == test_id && record.variants.matches(variants)
}

/// First candidate matching the identity, or `None`. Not finding a match is
/// the common case for a newly regressed test and is never an error.
pub fn find_open_regression<'a>(
    release: &str,
    test_id: &str,
    variants: &VariantSet,
    candidates: &'a [RegressionRecord],
) -> Option<&'a RegressionRecord> {
    candidates
        .iter()
        .find(|record| matches_regression(release, test_id, variants, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn record(id: &str, release: &str, test_id: &str, variants: VariantSet) -> RegressionRecord {
        RegressionRecord {
            regression_id: id.to_string(),
            release: release.to_string(),
            test_id: test_id.to_string(),
            test_name: format!("name of {}", test_id),
            variants,
            opened: Utc::now(),
            closed: None,
            stats: None,
        }
    }

    fn aws_ovn() -> VariantSet {
        VariantSet::new().with("Platform", "aws").with("Network", "ovn")
    }

    #[test]
    fn test_matches_on_exact_identity() {
        let candidates = vec![record("r1", "4.16", "T1", aws_ovn())];
        let found = find_open_regression("4.16", "T1", &aws_ovn(), &candidates);
        assert_eq!(found.map(|r| r.regression_id.as_str()), Some("r1"));
    }

    #[test]
    fn test_differing_variant_value_does_not_match() {
        let candidates = vec![record("r1", "4.16", "T1", aws_ovn())];
        let sdn = VariantSet::new().with("Platform", "aws").with("Network", "sdn");
        assert!(find_open_regression("4.16", "T1", &sdn, &candidates).is_none());
    }

    #[test]
    fn test_release_and_test_id_scope_the_match() {
        let candidates = vec![record("r1", "4.15", "T1", aws_ovn())];
        assert!(find_open_regression("4.16", "T1", &aws_ovn(), &candidates).is_none());
        assert!(find_open_regression("4.15", "T2", &aws_ovn(), &candidates).is_none());
    }

    #[test]
    fn test_renamed_test_still_matches_by_id() {
        let mut renamed = record("r1", "4.16", "T1", aws_ovn());
        renamed.test_name = "old name".to_string();
        let candidates = vec![renamed];
        assert!(find_open_regression("4.16", "T1", &aws_ovn(), &candidates).is_some());
    }

    #[test]
    fn test_returns_first_match() {
        let candidates = vec![
            record("r1", "4.16", "T1", aws_ovn()),
            record("r2", "4.16", "T1", aws_ovn()),
        ];
        let found = find_open_regression("4.16", "T1", &aws_ovn(), &candidates).unwrap();
        assert_eq!(found.regression_id, "r1");
    }

    #[test]
    fn test_empty_candidates() {
        assert!(find_open_regression("4.16", "T1", &aws_ovn(), &[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_identical_identity_always_matches(
            test_id in "[a-z0-9:]{1,16}",
            pairs in proptest::collection::btree_map("[A-Z][a-z]{1,8}", "[a-z0-9]{0,8}", 0..6),
        ) {
            let variants: VariantSet = pairs.into_iter().collect();
            let candidates = vec![record("r1", "4.16", &test_id, variants.clone())];
            prop_assert!(find_open_regression("4.16", &test_id, &variants, &candidates).is_some());
        }

        #[test]
        fn prop_changed_value_never_matches(
            pairs in proptest::collection::btree_map("[A-Z][a-z]{1,8}", "[a-z0-9]{1,8}", 1..6),
        ) {
            let stored: VariantSet = pairs.clone().into_iter().collect();
            let (key, value) = pairs.into_iter().next().unwrap();
            let query = stored.clone().with(key, format!("{}-changed", value));
            let candidates = vec![record("r1", "4.16", "T1", stored)];
            prop_assert!(find_open_regression("4.16", "T1", &query, &candidates).is_none());
        }
    }
}
