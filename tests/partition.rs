//! End-to-end partition: classification, clone planning, and the asymmetric
//! rewrite, driven through the same pipeline the binary runs.

#![allow(clippy::all, clippy::pedantic, clippy::unwrap_used)]

mod common;

use common::{entry, form, list, npc, order, outfit, plugin};
use loadstone::config::LoadstoneConfig;
use loadstone::model::record::Record;
use loadstone::partition::classify::{AmbiguousGender, UsageClass, classify, shared_ids};
use loadstone::pipeline;
use loadstone::store::{MemoryStore, RecordStore};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// The canonical shared-list population:
///
/// - list L (0x10) with one entry
/// - outfit O_A (0x20) and outfit O_B (0x21), both listing L
/// - male NPC_A (0x30) wearing O_A, female NPC_B (0x31) wearing O_B
fn shared_population() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x10),
        list("LItemArmor", vec![entry(1, form("base.esm", 0x40), 1)]),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x20),
        outfit(vec![form("base.esm", 0x10)]),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x21),
        outfit(vec![form("base.esm", 0x10)]),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x30),
        npc(Some(false), Some(form("base.esm", 0x20)), None),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x31),
        npc(Some(true), Some(form("base.esm", 0x21)), None),
    );
    store
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn shared_list_is_detected() {
    let store = shared_population();
    let order = order(&["base.esm"]);
    let usage = classify(&store, &order, AmbiguousGender::Both);
    assert_eq!(shared_ids(&usage), vec![form("base.esm", 0x10)]);
}

#[test]
fn classification_respects_overrides() {
    // An override flips NPC_B to male: the list is no longer shared.
    let mut store = shared_population();
    store.insert(
        plugin("patch-in.esp"),
        form("base.esm", 0x31),
        npc(Some(false), Some(form("base.esm", 0x21)), None),
    );

    let order = order(&["base.esm", "patch-in.esp"]);
    let usage = classify(&store, &order, AmbiguousGender::Both);
    assert!(shared_ids(&usage).is_empty());
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn run_partitions_the_shared_list_asymmetrically() {
    let store = shared_population();
    let order = order(&["base.esm"]);
    let outcome = pipeline::run(&store, &order, &LoadstoneConfig::default());

    // One clone, minted under the patch plugin.
    assert_eq!(outcome.report.partitioned.len(), 1);
    let (original, clone_id) = outcome.report.partitioned[0].clone();
    assert_eq!(original, form("base.esm", 0x10));
    assert_eq!(clone_id.plugin(), &plugin("loadstone patch.esp"));

    // The clone is a deep copy tagged for the rewritten class.
    let clone = outcome
        .patch
        .record(&clone_id)
        .and_then(Record::as_leveled_list)
        .unwrap();
    assert_eq!(clone.editor_id.as_deref(), Some("LItemArmor_Male"));
    assert_eq!(clone.entries.len(), 1);

    // Male side: outfit redirected, NPC override written, armor slot cleared.
    let male_outfit = outcome
        .patch
        .record(&form("base.esm", 0x20))
        .and_then(Record::as_outfit)
        .unwrap();
    assert_eq!(male_outfit.items, vec![clone_id]);
    let male_npc = outcome
        .patch
        .record(&form("base.esm", 0x30))
        .and_then(Record::as_npc)
        .unwrap();
    assert_eq!(male_npc.worn_armor, None);
    assert_eq!(male_npc.default_outfit, Some(form("base.esm", 0x20)));

    // Female side: no overrides at all, originals stay the representative.
    assert!(outcome.patch.record(&form("base.esm", 0x31)).is_none());
    assert!(outcome.patch.record(&form("base.esm", 0x21)).is_none());
    let female_outfit = store
        .dereference(&order, &form("base.esm", 0x21))
        .and_then(Record::as_outfit)
        .unwrap();
    assert_eq!(female_outfit.items, vec![form("base.esm", 0x10)]);
}

#[test]
fn run_is_deterministic_across_invocations() {
    let store = shared_population();
    let order = order(&["base.esm"]);
    let config = LoadstoneConfig::default();

    let first = pipeline::run(&store, &order, &config);
    let second = pipeline::run(&store, &order, &config);
    assert_eq!(first.report.partitioned, second.report.partitioned);
    assert_eq!(first.patch.emit(), second.patch.emit());
}

#[test]
fn female_class_selection_rewrites_the_other_side() {
    let store = shared_population();
    let order = order(&["base.esm"]);
    let mut config = LoadstoneConfig::default();
    config.partition.class = UsageClass::Female;

    let outcome = pipeline::run(&store, &order, &config);
    assert!(outcome.patch.record(&form("base.esm", 0x31)).is_some());
    assert!(outcome.patch.record(&form("base.esm", 0x30)).is_none());
}

#[test]
fn neither_policy_leaves_ambiguous_population_unpartitioned() {
    // NPC_B carries no gender flag. Under `neither` only the male NPC
    // counts, so nothing is shared and the patch stays empty.
    let mut store = shared_population();
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x31),
        npc(None, Some(form("base.esm", 0x21)), None),
    );

    let order = order(&["base.esm"]);
    let mut config = LoadstoneConfig::default();
    config.partition.ambiguous_gender = AmbiguousGender::Neither;

    let outcome = pipeline::run(&store, &order, &config);
    assert!(outcome.report.partitioned.is_empty());
    assert!(outcome.patch.is_empty());
}

#[test]
fn single_class_population_needs_no_partition() {
    let mut store = MemoryStore::new();
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x10),
        list("LItemArmor", vec![]),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x20),
        outfit(vec![form("base.esm", 0x10)]),
    );
    store.insert(
        plugin("base.esm"),
        form("base.esm", 0x30),
        npc(Some(false), Some(form("base.esm", 0x20)), None),
    );

    let order = order(&["base.esm"]);
    let outcome = pipeline::run(&store, &order, &LoadstoneConfig::default());
    assert!(outcome.patch.is_empty());
}
