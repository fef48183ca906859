//! Cross-platform snapshot parity matching.
//!
//! Given two indices keyed by [`CanonicalId`], classify every identifier in
//! their union as present on both sides, only side A, or only side B. Rows
//! come out in ascending identifier order whatever order the indices were
//! populated in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::snapshot::{CanonicalId, SnapshotEntry, SnapshotIndex};

/// Which side(s) a canonical identifier was found on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParityClassification {
    Matched,
    PlatformAOnly,
    PlatformBOnly,
}

/// One comparison record for a single canonical identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParityRow {
    pub canonical_id: CanonicalId,
    pub classification: ParityClassification,
    pub entries_a: Vec<SnapshotEntry>,
    pub entries_b: Vec<SnapshotEntry>,
}

/// Running totals per classification.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParityCounts {
    pub matched: usize,
    pub a_only: usize,
    pub b_only: usize,
}

impl ParityCounts {
    pub fn total(&self) -> usize {
        self.matched + self.a_only + self.b_only
    }

    fn record(&mut self, classification: ParityClassification) {
        match classification {
            ParityClassification::Matched => self.matched += 1,
            ParityClassification::PlatformAOnly => self.a_only += 1,
            ParityClassification::PlatformBOnly => self.b_only += 1,
        }
    }
}

/// Matcher output: rows in identifier order plus their counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParityMatch {
    pub rows: Vec<ParityRow>,
    pub counts: ParityCounts,
}

/// Classify the union of both indices' identifiers.
///
/// Invariants: one row per distinct identifier, `counts.total() ==
/// rows.len()`, rows sorted ascending by identifier.
pub fn match_indices(index_a: &SnapshotIndex, index_b: &SnapshotIndex) -> ParityMatch {
    let keys: BTreeSet<&CanonicalId> = index_a.keys().chain(index_b.keys()).collect();

    let mut rows = Vec::with_capacity(keys.len());
    let mut counts = ParityCounts::default();

    for key in keys {
        let (classification, entries_a, entries_b) = match (index_a.get(key), index_b.get(key)) {
            (Some(a), Some(b)) => (ParityClassification::Matched, a.clone(), b.clone()),
            (Some(a), None) => (ParityClassification::PlatformAOnly, a.clone(), Vec::new()),
            (None, Some(b)) => (ParityClassification::PlatformBOnly, Vec::new(), b.clone()),
            (None, None) => continue,
        };

        counts.record(classification);
        rows.push(ParityRow {
            canonical_id: key.clone(),
            classification,
            entries_a,
            entries_b,
        });
    }

    ParityMatch { rows, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Platform;

    fn index(platform: Platform, items: &[(&str, &str)]) -> SnapshotIndex {
        let mut idx = SnapshotIndex::new();
        for (id, path) in items {
            idx.entry(CanonicalId::from(*id))
                .or_default()
                .push(SnapshotEntry::new(*path, platform));
        }
        idx
    }

    #[test]
    fn test_matched_and_b_only() {
        let a = index(Platform::Ios, &[("TextBlock", "p1")]);
        let b = index(Platform::Android, &[("TextBlock", "p2"), ("Image", "p3")]);

        let result = match_indices(&a, &b);
        assert_eq!(result.rows.len(), 2);

        let image = &result.rows[0];
        assert_eq!(image.canonical_id.as_str(), "Image");
        assert_eq!(image.classification, ParityClassification::PlatformBOnly);
        assert!(image.entries_a.is_empty());

        let text = &result.rows[1];
        assert_eq!(text.canonical_id.as_str(), "TextBlock");
        assert_eq!(text.classification, ParityClassification::Matched);

        assert_eq!(
            result.counts,
            ParityCounts {
                matched: 1,
                a_only: 0,
                b_only: 1
            }
        );
    }

    #[test]
    fn test_a_only() {
        let a = index(Platform::Ios, &[("Carousel", "p1")]);
        let b = SnapshotIndex::new();
        let result = match_indices(&a, &b);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(
            result.rows[0].classification,
            ParityClassification::PlatformAOnly
        );
        assert_eq!(result.counts.a_only, 1);
    }

    #[test]
    fn test_empty_indices() {
        let result = match_indices(&SnapshotIndex::new(), &SnapshotIndex::new());
        assert!(result.rows.is_empty());
        assert_eq!(result.counts.total(), 0);
    }

    #[test]
    fn test_entries_carried_through() {
        let a = index(Platform::Ios, &[("Card", "ios/Card_light.png"), ("Card", "ios/Card_dark.png")]);
        let b = index(Platform::Android, &[("Card", "android/Card.png")]);
        let result = match_indices(&a, &b);
        assert_eq!(result.rows[0].entries_a.len(), 2);
        assert_eq!(result.rows[0].entries_b.len(), 1);
    }
}
