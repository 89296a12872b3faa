//! Core data model: identity types, load order, and record payloads.

pub mod order;
pub mod record;
pub mod types;

pub use order::{LoadOrder, LoadOrderError};
pub use record::{LeveledList, ListEntry, ListFlags, Npc, Outfit, Record, RecordKind};
pub use types::{FormId, PluginName, ValidationError};
