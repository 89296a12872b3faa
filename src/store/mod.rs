//! Record store trait and common types.
//!
//! Defines the interface between the resolution/partition pipeline and the
//! host's record storage. The pipeline depends only on this contract, never
//! on how the host keeps its plugins; the built-in [`MemoryStore`] backs the
//! CLI and the test suites.

pub mod memory;
pub mod patch;

use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::{FormId, PluginName};

pub use memory::{MemoryStore, Snapshot, SnapshotError, SnapshotRecord};
pub use patch::{CloneError, PatchLayer};

/// Read access to the contributing versions of records.
///
/// # Key invariants
///
/// - **Lookup misses are not errors**: an unknown form id yields an empty
///   contributor list or `None`, never a failure.
/// - **Snapshot semantics**: the store is read-only for the duration of the
///   scan phases; all mutation happens in the separate [`PatchLayer`].
/// - **No ordering promise**: `contributors` may return versions in any
///   order. Chain ordering is the resolver's job, driven by the explicit
///   [`LoadOrder`] threaded through every query — there is no ambient
///   process-wide order.
pub trait RecordStore {
    /// All `(plugin, version)` pairs contributed for a form id, in no
    /// particular order. Empty if the id is unknown.
    fn contributors(&self, id: &FormId) -> Vec<(&PluginName, &Record)>;

    /// Single-hop dereference: the winning version of a form id under the
    /// given load order, or `None` on a miss. Misses are a normal outcome
    /// (dangling references exist in real load orders).
    fn dereference(&self, order: &LoadOrder, id: &FormId) -> Option<&Record>;

    /// Every form id known to the store, in ascending order for
    /// deterministic scans.
    fn ids(&self) -> Vec<FormId>;
}
