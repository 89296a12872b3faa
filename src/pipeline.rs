//! The batch run: attribution → classification → partition → rewrite.
//!
//! Single-threaded and synchronous over one immutable snapshot. The scan
//! phases are pure reads; the patch layer is written only after all reads
//! complete, by exactly one logical writer. A run either completes or the
//! process aborts on a fatal error from an external collaborator — there is
//! no cancellation mid-run.

use std::fmt;

use tracing::{info, warn};

use crate::config::LoadstoneConfig;
use crate::model::order::LoadOrder;
use crate::model::record::Record;
use crate::model::types::{FormId, PluginName};
use crate::partition::classify::{classify, shared_ids};
use crate::partition::rewrite::{RewriteStats, build_plan, rewrite};
use crate::resolve::attribution::{Attribution, attribute_in_base};
use crate::store::{PatchLayer, RecordStore};

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

/// One attributed identity in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributionLine {
    /// The configured label of the tracked plugin.
    pub label: String,
    /// The designated plugin.
    pub plugin: PluginName,
    /// The attributed record.
    pub id: FormId,
    /// The classification.
    pub attribution: Attribution,
}

/// The textual report of a run: one line per attributed identity and one
/// per partitioned identity.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// Attribution results across all tracked plugins.
    pub attributed: Vec<AttributionLine>,
    /// `(original, clone)` per partitioned identity.
    pub partitioned: Vec<(FormId, FormId)>,
    /// Rewrite counters.
    pub stats: RewriteStats,
}

impl RunReport {
    /// The attributed identities representing real changes (introduced or
    /// modified).
    pub fn real_changes(&self) -> impl Iterator<Item = &AttributionLine> {
        self.attributed
            .iter()
            .filter(|line| line.attribution.is_real_change())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.attributed {
            match &line.attribution {
                Attribution::Modified { previous_plugin, .. } => writeln!(
                    f,
                    "[{}] {}: modified by {} (previous from {})",
                    line.label, line.id, line.plugin, previous_plugin
                )?,
                other => writeln!(
                    f,
                    "[{}] {}: {} by {}",
                    line.label, line.id, other, line.plugin
                )?,
            }
        }
        for (original, clone) in &self.partitioned {
            writeln!(f, "partitioned {original} -> {clone}")?;
        }
        Ok(())
    }
}

/// Everything a run produces: the report and the patch layer to write out.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// The textual report.
    pub report: RunReport,
    /// The output layer (clones + overrides).
    pub patch: PatchLayer,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Run the attribution phase only (read-only).
///
/// A tracked plugin that is not in the load order is malformed
/// configuration: it is skipped with a warning and does not abort the run.
/// Records are attributed when their winning version is a leveled list and
/// their chain originates in the configured base set. `Absent` results are
/// not reported — the designated plugin simply never touched those records.
pub fn attribute_tracked(
    store: &impl RecordStore,
    order: &LoadOrder,
    config: &LoadstoneConfig,
) -> Vec<AttributionLine> {
    let base = order.base_set(config.attribution.base_plugins);
    let mut lines = Vec::new();

    for (label, plugin) in &config.attribution.tracked {
        if !order.contains(plugin) {
            warn!(%label, %plugin, "tracked plugin not in load order; skipping");
            continue;
        }
        for id in store.ids() {
            if store
                .dereference(order, &id)
                .and_then(Record::as_leveled_list)
                .is_none()
            {
                continue;
            }
            let Some(attribution) = attribute_in_base(store, order, &id, plugin, base) else {
                continue;
            };
            if attribution == Attribution::Absent {
                continue;
            }
            lines.push(AttributionLine {
                label: label.clone(),
                plugin: plugin.clone(),
                id,
                attribution,
            });
        }
    }

    info!(attributed = lines.len(), "attribution phase complete");
    lines
}

/// Run the full pipeline over one snapshot.
///
/// An empty `tracked` table skips attribution; an empty shared set skips
/// partitioning. Neither is an error.
pub fn run(
    store: &impl RecordStore,
    order: &LoadOrder,
    config: &LoadstoneConfig,
) -> RunOutcome {
    let attributed = attribute_tracked(store, order, config);

    let usage = classify(store, order, config.partition.ambiguous_gender);
    let shared = shared_ids(&usage);
    info!(
        used = usage.len(),
        shared = shared.len(),
        "classification phase complete"
    );

    let mut patch = PatchLayer::new(config.patch.plugin.clone());
    let plan = build_plan(store, order, &mut patch, &shared, config.partition.class);
    let stats = rewrite(
        store,
        order,
        &mut patch,
        &plan,
        config.partition.class,
        config.partition.ambiguous_gender,
    );
    info!(
        clones = plan.len(),
        consumers = stats.consumers_rewritten,
        references = stats.references_redirected,
        "partition phase complete"
    );

    let partitioned = plan
        .iter()
        .map(|(original, clone)| (original.clone(), clone.clone()))
        .collect();

    RunOutcome {
        report: RunReport {
            attributed,
            partitioned,
            stats,
        },
        patch,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
