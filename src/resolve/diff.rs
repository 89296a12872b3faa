//! Semantic equivalence of leveled-list versions.
//!
//! Two versions of the same record are equivalent iff their scalar/flag
//! fields match and their entry collections match as *multisets*: order
//! never matters, but duplicate entries are counted. A plain set comparison
//! would call `[(1,A,5),(1,A,5)]` and `[(1,A,5)]` equal and miss a real
//! change; counting duplicates avoids that false "no change".
//!
//! Absent sub-fields (`None`) are ordinary values: `None == None`, and
//! `None` differs from every concrete value.

use std::collections::BTreeMap;

use crate::model::record::{LeveledList, ListEntry};

// ---------------------------------------------------------------------------
// equivalent
// ---------------------------------------------------------------------------

/// Returns `true` if two same-identity leveled-list versions carry the same
/// content.
///
/// Editor ids are developer labels, not content, and do not participate.
#[must_use]
pub fn equivalent(a: &LeveledList, b: &LeveledList) -> bool {
    if a.flags != b.flags || a.chance_none != b.chance_none {
        return false;
    }
    // Fast path: differing entry counts can never be multiset-equal.
    if a.entries.len() != b.entries.len() {
        return false;
    }
    entry_counts(&a.entries) == entry_counts(&b.entries)
}

fn entry_counts(entries: &[ListEntry]) -> BTreeMap<&ListEntry, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
