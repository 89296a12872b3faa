//! Record payloads — the structural value one plugin contributes for one
//! form id.
//!
//! Three record kinds participate in the pipeline: leveled lists (the shared
//! dependency being attributed and partitioned), NPCs (the consumers), and
//! outfits (the one-hop indirection between an NPC and its leveled lists).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::types::FormId;

// ---------------------------------------------------------------------------
// ListFlags
// ---------------------------------------------------------------------------

/// Raw behaviour flags of a leveled list.
///
/// Flag semantics belong to the host format; loadstone only needs bitwise
/// equality, so the byte is carried opaquely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListFlags(pub u8);

impl ListFlags {
    /// Calculate from all levels <= player level.
    pub const ALL_LEVELS: Self = Self(0x01);
    /// Calculate for each item in count.
    pub const EACH_ITEM: Self = Self(0x02);

    /// Returns `true` if all bits of `flag` are set.
    #[must_use]
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl fmt::Display for ListFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ListEntry
// ---------------------------------------------------------------------------

/// One entry of a leveled list: the tuple `(level, target, count)`.
///
/// Sub-fields may be absent in malformed or partially-defined records.
/// `None` is a first-class value in comparisons: `None == None`, and `None`
/// differs from every concrete value. Derived `Ord` gives entries a total
/// order so they can key the multiset used by the semantic differ.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListEntry {
    /// Minimum level at which the entry applies.
    #[serde(default)]
    pub level: Option<i16>,
    /// The referenced record (item or nested list).
    #[serde(default)]
    pub target: Option<FormId>,
    /// How many of the target to produce.
    #[serde(default)]
    pub count: Option<i16>,
}

impl ListEntry {
    /// Create a fully-specified entry.
    #[must_use]
    pub const fn new(level: i16, target: FormId, count: i16) -> Self {
        Self {
            level: Some(level),
            target: Some(target),
            count: Some(count),
        }
    }
}

// ---------------------------------------------------------------------------
// LeveledList
// ---------------------------------------------------------------------------

/// A leveled list record — the shared dependency of the pipeline.
///
/// `entries` is semantically an unordered multiset: two lists whose entries
/// differ only in order are the same list. Entry order is still preserved
/// for output fidelity; only the differ treats it as unordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledList {
    /// Developer-facing label; not part of record content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
    /// Behaviour flags.
    #[serde(default)]
    pub flags: ListFlags,
    /// Percent chance the list produces nothing.
    #[serde(default)]
    pub chance_none: Option<u8>,
    /// The entry multiset.
    #[serde(default)]
    pub entries: Vec<ListEntry>,
}

// ---------------------------------------------------------------------------
// Npc
// ---------------------------------------------------------------------------

/// An NPC record — a consumer of leveled lists through its outfits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    /// Developer-facing label; not part of record content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
    /// Gender flag. `None` when the record carries no configuration —
    /// classification of unflagged NPCs is a caller policy, never inferred
    /// here (the host format only stores a "female" bit).
    #[serde(default)]
    pub female: Option<bool>,
    /// Reference to the worn-armor outfit, if any.
    #[serde(default)]
    pub worn_armor: Option<FormId>,
    /// Reference to the default outfit, if any.
    #[serde(default)]
    pub default_outfit: Option<FormId>,
}

// ---------------------------------------------------------------------------
// Outfit
// ---------------------------------------------------------------------------

/// An outfit record — the single level of indirection between an NPC and
/// the leveled lists it depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    /// Developer-facing label; not part of record content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
    /// References to the outfit's items (typically leveled lists).
    #[serde(default)]
    pub items: Vec<FormId>,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A record value as contributed by one plugin for one form id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// A leveled list.
    LeveledList(LeveledList),
    /// An NPC.
    Npc(Npc),
    /// An outfit.
    Outfit(Outfit),
}

/// The kind of a [`Record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A leveled list.
    LeveledList,
    /// An NPC.
    Npc,
    /// An outfit.
    Outfit,
}

impl Record {
    /// The kind of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::LeveledList(_) => RecordKind::LeveledList,
            Self::Npc(_) => RecordKind::Npc,
            Self::Outfit(_) => RecordKind::Outfit,
        }
    }

    /// The leveled-list payload, or `None` for other kinds.
    #[must_use]
    pub const fn as_leveled_list(&self) -> Option<&LeveledList> {
        match self {
            Self::LeveledList(list) => Some(list),
            _ => None,
        }
    }

    /// The NPC payload, or `None` for other kinds.
    #[must_use]
    pub const fn as_npc(&self) -> Option<&Npc> {
        match self {
            Self::Npc(npc) => Some(npc),
            _ => None,
        }
    }

    /// The outfit payload, or `None` for other kinds.
    #[must_use]
    pub const fn as_outfit(&self) -> Option<&Outfit> {
        match self {
            Self::Outfit(outfit) => Some(outfit),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeveledList => write!(f, "leveled list"),
            Self::Npc => write!(f, "npc"),
            Self::Outfit => write!(f, "outfit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
