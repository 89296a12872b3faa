//! Patch output layer.
//!
//! The single-writer output of a run: freshly minted leveled-list clones and
//! consumer overrides. All scan phases read only the host store; the patch
//! layer is the one place mutation happens, strictly after reads complete.
//!
//! Mirrors the host's override machinery: `npc_override` / `outfit_override`
//! copy the winning version into the layer on first access and hand back a
//! mutable reference, so repeated access edits the same override.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::order::LoadOrder;
use crate::model::record::{Npc, Outfit, Record, RecordKind};
use crate::model::types::{FormId, PluginName};

use super::RecordStore;
use super::memory::SnapshotRecord;

// ---------------------------------------------------------------------------
// PatchLayer
// ---------------------------------------------------------------------------

/// The mutable output layer of a run.
#[derive(Clone, Debug)]
pub struct PatchLayer {
    plugin: PluginName,
    next_index: u32,
    clones: BTreeMap<FormId, FormId>,
    records: BTreeMap<FormId, Record>,
}

impl PatchLayer {
    /// First record index minted for new records.
    const FIRST_INDEX: u32 = 0x0008_00;

    /// Create an empty patch layer writing under the given plugin name.
    #[must_use]
    pub fn new(plugin: PluginName) -> Self {
        Self {
            plugin,
            next_index: Self::FIRST_INDEX,
            clones: BTreeMap::new(),
            records: BTreeMap::new(),
        }
    }

    /// The plugin name new records are minted under.
    #[must_use]
    pub const fn plugin(&self) -> &PluginName {
        &self.plugin
    }

    /// The clone minted for `original`, if one exists in this layer.
    #[must_use]
    pub fn clone_of(&self, original: &FormId) -> Option<&FormId> {
        self.clones.get(original)
    }

    /// Number of records (clones + overrides) in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the layer holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deep-copy the winning leveled list of `original` into this layer
    /// under a freshly minted form id, tagging the clone's editor id with
    /// `suffix`.
    ///
    /// At most one clone is minted per original: a second call for the same
    /// id returns the existing clone, so repeated partition runs over the
    /// same layer never duplicate.
    ///
    /// # Errors
    /// [`CloneError::Missing`] if `original` does not dereference,
    /// [`CloneError::WrongKind`] if it is not a leveled list, and
    /// [`CloneError::IdSpaceExhausted`] if the layer's 24-bit index space
    /// is spent.
    pub fn clone_leveled_list(
        &mut self,
        store: &impl RecordStore,
        order: &LoadOrder,
        original: &FormId,
        suffix: &str,
    ) -> Result<FormId, CloneError> {
        if let Some(existing) = self.clones.get(original) {
            return Ok(existing.clone());
        }
        let record = store
            .dereference(order, original)
            .ok_or_else(|| CloneError::Missing {
                id: original.clone(),
            })?;
        let Some(list) = record.as_leveled_list() else {
            return Err(CloneError::WrongKind {
                id: original.clone(),
                kind: record.kind(),
            });
        };

        // Structural deep copy: the clone never aliases the original.
        let mut clone = list.clone();
        let base = clone.editor_id.as_deref().unwrap_or("LL");
        clone.editor_id = Some(format!("{base}_{suffix}"));

        let id = self.mint_id()?;
        self.records.insert(id.clone(), Record::LeveledList(clone));
        self.clones.insert(original.clone(), id.clone());
        Ok(id)
    }

    /// Get or create a mutable NPC override for `id`.
    ///
    /// On first access the winning version is copied into the layer;
    /// afterwards the same override is returned. `None` if `id` does not
    /// dereference to an NPC.
    pub fn npc_override(
        &mut self,
        store: &impl RecordStore,
        order: &LoadOrder,
        id: &FormId,
    ) -> Option<&mut Npc> {
        if !self.records.contains_key(id) {
            let npc = store.dereference(order, id)?.as_npc()?.clone();
            self.records.insert(id.clone(), Record::Npc(npc));
        }
        match self.records.get_mut(id) {
            Some(Record::Npc(npc)) => Some(npc),
            _ => None,
        }
    }

    /// Get or create a mutable outfit override for `id`.
    ///
    /// Same access rules as [`Self::npc_override`].
    pub fn outfit_override(
        &mut self,
        store: &impl RecordStore,
        order: &LoadOrder,
        id: &FormId,
    ) -> Option<&mut Outfit> {
        if !self.records.contains_key(id) {
            let outfit = store.dereference(order, id)?.as_outfit()?.clone();
            self.records.insert(id.clone(), Record::Outfit(outfit));
        }
        match self.records.get_mut(id) {
            Some(Record::Outfit(outfit)) => Some(outfit),
            _ => None,
        }
    }

    /// A record of this layer by id (clone or override).
    #[must_use]
    pub fn record(&self, id: &FormId) -> Option<&Record> {
        self.records.get(id)
    }

    /// Emit the layer as snapshot records for the output writer, ascending
    /// by form id.
    #[must_use]
    pub fn emit(&self) -> Vec<SnapshotRecord> {
        self.records
            .iter()
            .map(|(id, record)| SnapshotRecord {
                plugin: self.plugin.clone(),
                id: id.clone(),
                record: record.clone(),
            })
            .collect()
    }

    fn mint_id(&mut self) -> Result<FormId, CloneError> {
        if self.next_index > FormId::MAX_INDEX {
            return Err(CloneError::IdSpaceExhausted);
        }
        let index = self.next_index;
        self.next_index += 1;
        FormId::new(self.plugin.clone(), index).map_err(|_| CloneError::IdSpaceExhausted)
    }
}

// ---------------------------------------------------------------------------
// CloneError
// ---------------------------------------------------------------------------

/// A deep copy could not be constructed.
///
/// Per-identity and recoverable: the caller skips partitioning that identity
/// and continues the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloneError {
    /// The original does not dereference to any record.
    Missing {
        /// The unresolvable form id.
        id: FormId,
    },
    /// The original is not a leveled list.
    WrongKind {
        /// The form id that resolved to the wrong kind.
        id: FormId,
        /// The kind it resolved to.
        kind: RecordKind,
    },
    /// The patch layer's 24-bit record index space is spent.
    IdSpaceExhausted,
}

impl fmt::Display for CloneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { id } => write!(f, "cannot clone {id}: record not found"),
            Self::WrongKind { id, kind } => {
                write!(f, "cannot clone {id}: expected a leveled list, found {kind}")
            }
            Self::IdSpaceExhausted => {
                write!(f, "cannot clone: patch record index space exhausted")
            }
        }
    }
}

impl std::error::Error for CloneError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
