//! Partition rewriting: clone shared leveled lists and rewire one class.
//!
//! Deliberately asymmetric: the original stays the representative for every
//! other class, and only the designated class's consumers are redirected to
//! the clone. With two classes this splits the coupling at minimal churn —
//! no N-way split is attempted.
//!
//! Indirect references (NPC → outfit → list) are rewritten by editing the
//! outfit override's item list in place, not by cloning the outfit. An
//! outfit reached by both classes through other consumers therefore leaks
//! the clone to the other class; that secondary sharing is a known
//! limitation, not handled here.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::FormId;
use crate::partition::classify::{AmbiguousGender, UsageClass, classes_of};
use crate::store::{PatchLayer, RecordStore};

// ---------------------------------------------------------------------------
// ClonePlan
// ---------------------------------------------------------------------------

/// Mapping from a shared original to its class-specific clone.
///
/// Immutable after [`build_plan`]; exactly one clone per shared identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClonePlan {
    map: BTreeMap<FormId, FormId>,
}

impl ClonePlan {
    /// The clone for `original`, if it is part of the plan.
    #[must_use]
    pub fn clone_for(&self, original: &FormId) -> Option<&FormId> {
        self.map.get(original)
    }

    /// Number of planned clones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing was planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate `(original, clone)` pairs ascending by original id.
    pub fn iter(&self) -> impl Iterator<Item = (&FormId, &FormId)> {
        self.map.iter()
    }
}

// ---------------------------------------------------------------------------
// build_plan
// ---------------------------------------------------------------------------

/// Clone every shared leveled list into the patch layer and return the plan.
///
/// Clones are minted through [`PatchLayer::clone_leveled_list`], which
/// reuses an existing clone for the same original — running partition again
/// over the same layer yields the same mapping, never a second copy.
///
/// A clone failure skips that identity with a warning; the run continues
/// for the rest.
pub fn build_plan(
    store: &impl RecordStore,
    order: &LoadOrder,
    patch: &mut PatchLayer,
    shared: &[FormId],
    class: UsageClass,
) -> ClonePlan {
    let suffix = class_suffix(class);
    let mut map = BTreeMap::new();
    for original in shared {
        match patch.clone_leveled_list(store, order, original, suffix) {
            Ok(clone) => {
                debug!(%original, %clone, "planned clone");
                map.insert(original.clone(), clone);
            }
            Err(err) => {
                warn!(%original, %err, "skipping partition for identity");
            }
        }
    }
    ClonePlan { map }
}

const fn class_suffix(class: UsageClass) -> &'static str {
    match class {
        UsageClass::Male => "Male",
        UsageClass::Female => "Female",
    }
}

// ---------------------------------------------------------------------------
// rewrite
// ---------------------------------------------------------------------------

/// Counters from a rewrite pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// NPC overrides written.
    pub consumers_rewritten: usize,
    /// Leveled-list references redirected to a clone.
    pub references_redirected: usize,
}

/// Rewire the designated class's consumers onto their clones.
///
/// For each winning NPC of `class` whose worn-armor outfit lists a planned
/// original: the outfit override's matching items are swapped to the clone,
/// the NPC override's default outfit is pointed at the rewritten outfit,
/// and the now-superseded worn-armor slot is explicitly cleared — without
/// the clearing, override resolution would re-resolve the stale armor
/// reference. Consumers of the other class are never touched.
pub fn rewrite(
    store: &impl RecordStore,
    order: &LoadOrder,
    patch: &mut PatchLayer,
    plan: &ClonePlan,
    class: UsageClass,
    policy: AmbiguousGender,
) -> RewriteStats {
    let mut stats = RewriteStats::default();
    if plan.is_empty() {
        return stats;
    }

    for id in store.ids() {
        let Some(npc) = store.dereference(order, &id).and_then(Record::as_npc) else {
            continue;
        };
        if !classes_of(npc, policy).contains(class) {
            continue;
        }
        let Some(armor_ref) = npc.worn_armor.clone() else {
            continue;
        };
        let Some(outfit) = store
            .dereference(order, &armor_ref)
            .and_then(Record::as_outfit)
        else {
            continue;
        };
        if !outfit.items.iter().any(|item| plan.clone_for(item).is_some()) {
            continue;
        }

        // Clone exists before any reference to it is written: build_plan ran
        // to completion first.
        let Some(outfit_override) = patch.outfit_override(store, order, &armor_ref) else {
            continue;
        };
        for item in &mut outfit_override.items {
            if let Some(clone) = plan.clone_for(item) {
                *item = clone.clone();
                stats.references_redirected += 1;
            }
        }

        let Some(npc_override) = patch.npc_override(store, order, &id) else {
            continue;
        };
        npc_override.default_outfit = Some(armor_ref);
        npc_override.worn_armor = None;
        stats.consumers_rewritten += 1;
        debug!(npc = %id, "rewrote consumer onto clone");
    }

    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
