//! Comparison of reported balances with the reference index.

use crate::reference::ReferenceIndex;
use crate::types::{Batch, ReportedPair, UnreportedKey, VerdictRecord};
use std::collections::HashSet;

/// Produce one verdict per reported pair, in input order.
///
/// A reported key missing from the index is a mismatch with no expected value.
pub fn reconcile(reported: &[ReportedPair], index: &ReferenceIndex) -> Vec<VerdictRecord> {
    reported.iter().map(|pair| verdict(pair, index)).collect()
}

fn verdict(pair: &ReportedPair, index: &ReferenceIndex) -> VerdictRecord {
    let expected = index.expected(&pair.key);
    VerdictRecord {
        key: pair.key.clone(),
        reported: pair.reported,
        expected,
        is_match: expected == Some(pair.reported),
    }
}

/// Keys of a successfully queried batch that the response did not mention.
pub fn unreported_keys(
    batch: &Batch,
    reported: &[ReportedPair],
    index: &ReferenceIndex,
) -> Vec<UnreportedKey> {
    let seen: HashSet<&str> = reported.iter().map(|p| p.key.as_str()).collect();
    let mut missing = Vec::new();
    let mut listed = HashSet::new();
    for key in &batch.keys {
        if seen.contains(key.as_str()) || !listed.insert(key.as_str()) {
            continue;
        }
        missing.push(UnreportedKey {
            key: key.clone(),
            expected: index.expected(key).unwrap_or_default(),
        });
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;

    fn reference() -> ReferenceData {
        ReferenceData::from_pairs([("A", 10), ("B", 20), ("C", 30)])
    }

    #[test]
    fn test_match_and_mismatch() {
        let data = reference();
        let verdicts = reconcile(
            &[ReportedPair::new("A", 10), ReportedPair::new("C", 99)],
            data.index(),
        );
        assert_eq!(verdicts.len(), 2);
        assert!(verdicts[0].is_match);
        assert!(!verdicts[1].is_match);
        assert_eq!(verdicts[1].expected, Some(30));
        assert_eq!(verdicts[1].reported, 99);
    }

    #[test]
    fn test_absent_key_is_mismatch() {
        let data = reference();
        let verdicts = reconcile(&[ReportedPair::new("Z", 0)], data.index());
        assert_eq!(verdicts[0].expected, None);
        assert!(!verdicts[0].is_match);
    }

    #[test]
    fn test_zero_balance_matches_zero() {
        let data = ReferenceData::from_pairs([("Z", 0)]);
        let verdicts = reconcile(&[ReportedPair::new("Z", 0)], data.index());
        assert!(verdicts[0].is_match);
    }

    #[test]
    fn test_independent_of_arrival_order() {
        let data = reference();
        let pairs = vec![
            ReportedPair::new("A", 10),
            ReportedPair::new("B", 21),
            ReportedPair::new("X", 1),
        ];
        let mut reversed = pairs.clone();
        reversed.reverse();

        let mut forward = reconcile(&pairs, data.index());
        let mut backward = reconcile(&reversed, data.index());
        forward.sort_by(|a, b| a.key.cmp(&b.key));
        backward.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unreported_keys() {
        let data = reference();
        let batch = Batch {
            id: 0,
            keys: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };
        let missing = unreported_keys(&batch, &[ReportedPair::new("B", 20)], data.index());
        assert_eq!(
            missing,
            vec![
                UnreportedKey {
                    key: "A".to_string(),
                    expected: 10
                },
                UnreportedKey {
                    key: "C".to_string(),
                    expected: 30
                },
            ]
        );
    }

    #[test]
    fn test_unreported_keys_dedups_batch_keys() {
        let data = reference();
        let batch = Batch {
            id: 0,
            keys: vec!["A".to_string(), "A".to_string()],
        };
        assert_eq!(unreported_keys(&batch, &[], data.index()).len(), 1);
    }
}
