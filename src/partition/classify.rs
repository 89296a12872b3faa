//! Usage classification: which gender classes depend on which leveled lists.
//!
//! One pass over the winning NPC population. Each NPC contributes its class
//! set to every leveled list reachable through its outfits (worn armor and
//! default outfit — one hop of indirection, never deeper). Accumulation is
//! monotonic: class bits only flip on, and the map is read-only afterward.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::order::LoadOrder;
use crate::model::record::{Npc, Record};
use crate::model::types::FormId;
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// UsageClass / ClassSet
// ---------------------------------------------------------------------------

/// A consumer class: one of the two disjoint NPC populations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageClass {
    /// The male population.
    Male,
    /// The female population.
    Female,
}

impl fmt::Display for UsageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// The set of classes using a dependency. Mutated monotonically during the
/// scan (bits only flip false→true), read-only afterward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassSet {
    male: bool,
    female: bool,
}

impl ClassSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            male: false,
            female: false,
        }
    }

    /// A set holding one class.
    #[must_use]
    pub const fn single(class: UsageClass) -> Self {
        match class {
            UsageClass::Male => Self {
                male: true,
                female: false,
            },
            UsageClass::Female => Self {
                male: false,
                female: true,
            },
        }
    }

    /// The set holding both classes.
    #[must_use]
    pub const fn both() -> Self {
        Self {
            male: true,
            female: true,
        }
    }

    /// Returns `true` if `class` is in the set.
    #[must_use]
    pub const fn contains(self, class: UsageClass) -> bool {
        match class {
            UsageClass::Male => self.male,
            UsageClass::Female => self.female,
        }
    }

    /// Union with another set (monotonic).
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            male: self.male || other.male,
            female: self.female || other.female,
        }
    }

    /// Returns `true` if no class is in the set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.male && !self.female
    }

    /// Returns `true` if more than one class uses the dependency — the
    /// candidate condition for partitioning.
    #[must_use]
    pub const fn is_shared(self) -> bool {
        self.male && self.female
    }
}

// ---------------------------------------------------------------------------
// AmbiguousGender
// ---------------------------------------------------------------------------

/// Policy for NPCs whose record carries no gender flag.
///
/// The host format only stores a "female" bit, so an unflagged NPC is
/// genuinely ambiguous. The interpretation is a run-level configuration
/// choice, never hard-coded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousGender {
    /// Count unflagged NPCs as male.
    Male,
    /// Count unflagged NPCs as female.
    Female,
    /// Count unflagged NPCs as both classes (default: keeps their
    /// dependencies shared rather than claiming them for one class).
    #[default]
    Both,
    /// Ignore unflagged NPCs entirely.
    Neither,
}

/// The class set of one NPC under the given ambiguity policy.
#[must_use]
pub fn classes_of(npc: &Npc, policy: AmbiguousGender) -> ClassSet {
    match npc.female {
        Some(true) => ClassSet::single(UsageClass::Female),
        Some(false) => ClassSet::single(UsageClass::Male),
        None => match policy {
            AmbiguousGender::Male => ClassSet::single(UsageClass::Male),
            AmbiguousGender::Female => ClassSet::single(UsageClass::Female),
            AmbiguousGender::Both => ClassSet::both(),
            AmbiguousGender::Neither => ClassSet::empty(),
        },
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Scan the winning NPC population and accumulate, per leveled-list id, the
/// set of classes that reach it through an outfit.
///
/// Unresolvable links contribute nothing (dangling references are normal),
/// as do NPCs with no resolvable outfit and NPCs whose class set is empty
/// under the policy. Iteration order is deterministic.
pub fn classify(
    store: &impl RecordStore,
    order: &LoadOrder,
    policy: AmbiguousGender,
) -> BTreeMap<FormId, ClassSet> {
    let mut usage: BTreeMap<FormId, ClassSet> = BTreeMap::new();

    for id in store.ids() {
        let Some(npc) = store.dereference(order, &id).and_then(Record::as_npc) else {
            continue;
        };
        let classes = classes_of(npc, policy);
        if classes.is_empty() {
            continue;
        }

        for outfit_ref in [&npc.worn_armor, &npc.default_outfit] {
            let Some(outfit) = outfit_ref
                .as_ref()
                .and_then(|r| store.dereference(order, r))
                .and_then(Record::as_outfit)
            else {
                continue;
            };
            for item in &outfit.items {
                // Only leveled-list items participate; other item kinds are
                // outside the partitioning problem.
                if store
                    .dereference(order, item)
                    .and_then(Record::as_leveled_list)
                    .is_some()
                {
                    let slot = usage.entry(item.clone()).or_insert_with(ClassSet::empty);
                    *slot = slot.union(classes);
                }
            }
        }
    }

    usage
}

/// The ids in a usage map used by more than one class, ascending.
#[must_use]
pub fn shared_ids(usage: &BTreeMap<FormId, ClassSet>) -> Vec<FormId> {
    usage
        .iter()
        .filter(|(_, classes)| classes.is_shared())
        .map(|(id, _)| id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
