//! Version chain resolution.
//!
//! For one form id, the chain is every contributed version ordered ascending
//! by load-order position; the winner is the last element. Chains are
//! recomputed per query — never cached across a run's mutations — and an
//! empty chain is a valid outcome meaning "identity unknown".

use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::{FormId, PluginName};
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// Versioned
// ---------------------------------------------------------------------------

/// One link of a version chain: a contributed version plus where its plugin
/// sits in the load order.
#[derive(Clone, Copy, Debug)]
pub struct Versioned<'a> {
    /// The contributing plugin.
    pub plugin: &'a PluginName,
    /// The plugin's position in the load order.
    pub position: usize,
    /// The contributed value.
    pub record: &'a Record,
}

// ---------------------------------------------------------------------------
// resolve_chain
// ---------------------------------------------------------------------------

/// Resolve the version chain of `id`, ascending by load-order position.
///
/// Contributions from plugins that are not in the load order are excluded.
/// The result is empty when the id is unknown or no contributor is ordered —
/// callers treat that as "no contribution", not an error.
pub fn resolve_chain<'a>(
    store: &'a impl RecordStore,
    order: &LoadOrder,
    id: &FormId,
) -> Vec<Versioned<'a>> {
    let mut chain: Vec<Versioned<'a>> = store
        .contributors(id)
        .into_iter()
        .filter_map(|(plugin, record)| {
            Some(Versioned {
                plugin,
                position: order.position(plugin)?,
                record,
            })
        })
        .collect();
    // Positions are unique by LoadOrder construction, so this sort has no ties.
    chain.sort_by_key(|v| v.position);
    chain
}

/// The winning version of a chain: the last (highest-position) element.
#[must_use]
pub fn winner<'a, 'c>(chain: &'c [Versioned<'a>]) -> Option<&'c Versioned<'a>> {
    chain.last()
}

/// The index of `plugin`'s contribution within a chain.
///
/// `None` is a normal, non-error outcome: the plugin never touched this
/// record.
#[must_use]
pub fn position_of(plugin: &PluginName, chain: &[Versioned<'_>]) -> Option<usize> {
    chain.iter().position(|v| v.plugin == plugin)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
