//! In-memory record store, loadable from a JSON snapshot.
//!
//! The snapshot is the host-side seam: whatever discovered the installed
//! plugins serializes one [`Snapshot`] (load order + every contributed
//! version) and the pipeline runs over it without touching the host again.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::{FormId, PluginName};

use super::RecordStore;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A serialized view of the installed plugin population.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Plugins lowest-priority first.
    pub load_order: LoadOrder,
    /// Every contributed version across all plugins.
    pub records: Vec<SnapshotRecord>,
}

/// One plugin's contribution for one form id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotRecord {
    /// The contributing plugin. For an override this differs from the
    /// originating plugin embedded in `id`.
    pub plugin: PluginName,
    /// The identity of the logical record.
    pub id: FormId,
    /// The contributed value.
    pub record: Record,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns a [`SnapshotError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|e| SnapshotError {
            path: Some(path.to_path_buf()),
            detail: format!("cannot read snapshot: {e}"),
        })?;
        serde_json::from_str(&text).map_err(|e| SnapshotError {
            path: Some(path.to_path_buf()),
            detail: format!("cannot parse snapshot: {e}"),
        })
    }
}

/// A snapshot that could not be loaded.
#[derive(Clone, Debug)]
pub struct SnapshotError {
    /// Path to the snapshot file, if known.
    pub path: Option<PathBuf>,
    /// Human-readable description of the problem.
    pub detail: String,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "snapshot '{}': {}", path.display(), self.detail),
            None => write!(f, "snapshot: {}", self.detail),
        }
    }
}

impl std::error::Error for SnapshotError {}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-memory [`RecordStore`].
///
/// Contributions are kept per form id in insertion order; the resolver
/// re-sorts by load-order position on every query, so insertion order never
/// affects results.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<FormId, Vec<(PluginName, Record)>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot's records.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut store = Self::new();
        for rec in &snapshot.records {
            store.insert(rec.plugin.clone(), rec.id.clone(), rec.record.clone());
        }
        store
    }

    /// Record one plugin's contribution for a form id.
    ///
    /// A plugin contributing twice for the same id replaces its earlier
    /// contribution (a plugin holds at most one version of a record).
    pub fn insert(&mut self, plugin: PluginName, id: FormId, record: Record) {
        let contributions = self.records.entry(id).or_default();
        if let Some(slot) = contributions.iter_mut().find(|(p, _)| *p == plugin) {
            slot.1 = record;
        } else {
            contributions.push((plugin, record));
        }
    }

    /// Number of distinct form ids in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn contributors(&self, id: &FormId) -> Vec<(&PluginName, &Record)> {
        self.records
            .get(id)
            .map(|contributions| contributions.iter().map(|(p, r)| (p, r)).collect())
            .unwrap_or_default()
    }

    fn dereference(&self, order: &LoadOrder, id: &FormId) -> Option<&Record> {
        self.records
            .get(id)?
            .iter()
            .filter_map(|(plugin, record)| Some((order.position(plugin)?, record)))
            .max_by_key(|(pos, _)| *pos)
            .map(|(_, record)| record)
    }

    fn ids(&self) -> Vec<FormId> {
        self.records.keys().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
