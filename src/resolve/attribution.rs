//! Attribution: did a designated plugin introduce, modify, or merely re-save
//! a record?
//!
//! Combines the chain resolver and the semantic differ. The engine is pure —
//! it classifies and returns; reporting and selection are caller concerns,
//! and nothing in the store is mutated.

use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::{FormId, PluginName};
use crate::resolve::chain::{position_of, resolve_chain};
use crate::resolve::diff::equivalent;
use crate::store::RecordStore;

use std::fmt;

// ---------------------------------------------------------------------------
// Attribution
// ---------------------------------------------------------------------------

/// The classification of a designated plugin's contribution to one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attribution {
    /// The plugin contributed no version of this record.
    Absent,
    /// The plugin's version is the first in the chain — a new record, with
    /// no previous version to diff against.
    Introduced,
    /// The plugin's version is content-identical to its predecessor in the
    /// chain: an obsolete re-save, not a real change.
    Unchanged,
    /// The plugin's version differs in substance from its predecessor.
    Modified {
        /// The plugin that contributed the predecessor version.
        previous_plugin: PluginName,
        /// The predecessor version, for diff reporting.
        previous: Record,
    },
}

impl Attribution {
    /// Returns `true` for `Introduced` and `Modified` — the contributions
    /// that represent a real change.
    #[must_use]
    pub const fn is_real_change(&self) -> bool {
        matches!(self, Self::Introduced | Self::Modified { .. })
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Introduced => write!(f, "introduced"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Modified { .. } => write!(f, "modified"),
        }
    }
}

// ---------------------------------------------------------------------------
// attribute
// ---------------------------------------------------------------------------

/// Classify `designated`'s contribution to `id`.
///
/// Resolves the chain, finds the designated plugin's position, and diffs
/// against the immediately preceding version:
///
/// - not in the chain → [`Attribution::Absent`];
/// - first in the chain → [`Attribution::Introduced`];
/// - equivalent to its predecessor → [`Attribution::Unchanged`];
/// - otherwise → [`Attribution::Modified`] with the predecessor attached.
///
/// A version or predecessor that is not a leveled list counts as a real
/// change (a record-kind change can never be a no-op re-save).
pub fn attribute(
    store: &impl RecordStore,
    order: &LoadOrder,
    id: &FormId,
    designated: &PluginName,
) -> Attribution {
    let chain = resolve_chain(store, order, id);
    let Some(index) = position_of(designated, &chain) else {
        return Attribution::Absent;
    };
    if index == 0 {
        return Attribution::Introduced;
    }

    let current = chain[index].record;
    let previous = &chain[index - 1];
    let same = match (current.as_leveled_list(), previous.record.as_leveled_list()) {
        (Some(a), Some(b)) => equivalent(b, a),
        _ => false,
    };
    if same {
        Attribution::Unchanged
    } else {
        Attribution::Modified {
            previous_plugin: previous.plugin.clone(),
            previous: previous.record.clone(),
        }
    }
}

/// [`attribute`], bounded to records that genuinely originate upstream of
/// the designated plugin.
///
/// Returns `None` — "out of scope", distinct from `Absent` — when the
/// chain's first contributor is not one of the configured `base` plugins.
/// The base set is a parameter of the run, never a constant.
pub fn attribute_in_base(
    store: &impl RecordStore,
    order: &LoadOrder,
    id: &FormId,
    designated: &PluginName,
    base: &[PluginName],
) -> Option<Attribution> {
    let chain = resolve_chain(store, order, id);
    let origin = chain.first()?.plugin;
    if !base.contains(origin) {
        return None;
    }
    Some(attribute(store, order, id, designated))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
