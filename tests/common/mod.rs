//! Shared builders for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use loadstone::model::order::LoadOrder;
use loadstone::model::record::{LeveledList, ListEntry, Npc, Outfit, Record};
use loadstone::model::types::{FormId, PluginName};

pub fn plugin(name: &str) -> PluginName {
    PluginName::new(name).unwrap()
}

pub fn form(name: &str, index: u32) -> FormId {
    FormId::new(plugin(name), index).unwrap()
}

pub fn order(names: &[&str]) -> LoadOrder {
    LoadOrder::new(names.iter().map(|n| plugin(n)).collect()).unwrap()
}

pub fn entry(level: i16, target: FormId, count: i16) -> ListEntry {
    ListEntry::new(level, target, count)
}

pub fn list(editor_id: &str, entries: Vec<ListEntry>) -> Record {
    Record::LeveledList(LeveledList {
        editor_id: Some(editor_id.to_owned()),
        entries,
        ..LeveledList::default()
    })
}

pub fn outfit(items: Vec<FormId>) -> Record {
    Record::Outfit(Outfit {
        editor_id: None,
        items,
    })
}

pub fn npc(female: Option<bool>, worn: Option<FormId>, default: Option<FormId>) -> Record {
    Record::Npc(Npc {
        editor_id: None,
        female,
        worn_armor: worn,
        default_outfit: default,
    })
}
