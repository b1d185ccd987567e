/// Pairing history index: co-occurrence counts between candidate identifiers.
///
/// Built once per recommendation request from a bulk fetch, read-only during
/// sampling, discarded afterwards. The backend may store a pair's count under
/// either ordering of the two identifiers (or split it across both), so the
/// index normalizes direction on insert and accumulates — lookups then see
/// the full count regardless of how the backend keyed it.
use std::collections::HashMap;

use crate::types::PairCount;

#[derive(Debug, Clone, Default)]
pub struct PairingHistoryIndex {
    /// Keyed by the lexicographically smaller identifier first.
    counts: HashMap<(String, String), u64>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl PairingHistoryIndex {
    pub fn new() -> Self {
        PairingHistoryIndex::default()
    }

    /// Build an index from bulk backend records, accumulating counts recorded
    /// in either direction.
    pub fn from_counts(records: &[PairCount]) -> Self {
        let mut index = PairingHistoryIndex::new();
        for record in records {
            index.record(&record.a, &record.b, record.count);
        }
        index
    }

    /// Add `count` co-occurrences between `a` and `b`. Direction does not
    /// matter; repeated calls accumulate. Negative counts are a caller
    /// precondition violation and are clamped to 0 rather than crashing.
    pub fn record(&mut self, a: &str, b: &str, count: i64) {
        let count = count.max(0) as u64;
        *self.counts.entry(pair_key(a, b)).or_insert(0) += count;
    }

    /// Number of historical co-occurrences between `a` and `b`.
    /// Missing entries mean zero.
    pub fn count(&self, a: &str, b: &str) -> u64 {
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// True when no pair has a positive count. An empty index carries no
    /// diversity signal, so callers fall back to rating-stratified sampling.
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_zero() {
        let index = PairingHistoryIndex::new();
        assert_eq!(index.count("a", "b"), 0);
    }

    #[test]
    fn test_count_is_direction_agnostic() {
        let mut index = PairingHistoryIndex::new();
        index.record("a", "b", 3);
        assert_eq!(index.count("a", "b"), 3);
        assert_eq!(index.count("b", "a"), 3);
    }

    #[test]
    fn test_partial_counts_from_both_directions_accumulate() {
        // Backend stored the same pair once per direction.
        let records = vec![
            PairCount { a: "a".into(), b: "b".into(), count: 2 },
            PairCount { a: "b".into(), b: "a".into(), count: 3 },
        ];
        let index = PairingHistoryIndex::from_counts(&records);
        assert_eq!(index.count("a", "b"), 5);
        assert_eq!(index.count("b", "a"), 5);
    }

    #[test]
    fn test_negative_counts_clamped_to_zero() {
        let mut index = PairingHistoryIndex::new();
        index.record("a", "b", -4);
        assert_eq!(index.count("a", "b"), 0);
        index.record("a", "b", 2);
        assert_eq!(index.count("a", "b"), 2);
    }

    #[test]
    fn test_is_empty() {
        let mut index = PairingHistoryIndex::new();
        assert!(index.is_empty());
        index.record("a", "b", 0);
        assert!(index.is_empty());
        index.record("a", "b", 1);
        assert!(!index.is_empty());
    }
}
