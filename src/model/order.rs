//! Load order — the explicit total order over plugin sources.
//!
//! Every resolver query takes a [`LoadOrder`] value; there is no ambient
//! process-wide ordering state. Positions are unique by construction
//! (duplicate plugin names are rejected), so comparison ties are impossible.
//! Lower position = lower priority; later plugins override earlier ones.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::types::PluginName;

// ---------------------------------------------------------------------------
// LoadOrder
// ---------------------------------------------------------------------------

/// An immutable, total order over plugins for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PluginName>", into = "Vec<PluginName>")]
pub struct LoadOrder {
    plugins: Vec<PluginName>,
    positions: HashMap<PluginName, usize>,
}

impl LoadOrder {
    /// Build a load order from plugins listed lowest-priority first.
    ///
    /// # Errors
    /// Returns a [`LoadOrderError`] if a plugin appears more than once.
    pub fn new(plugins: Vec<PluginName>) -> Result<Self, LoadOrderError> {
        let mut positions = HashMap::with_capacity(plugins.len());
        for (pos, plugin) in plugins.iter().enumerate() {
            if positions.insert(plugin.clone(), pos).is_some() {
                return Err(LoadOrderError::Duplicate {
                    plugin: plugin.clone(),
                });
            }
        }
        Ok(Self { plugins, positions })
    }

    /// The position of a plugin, or `None` if it is not in the order.
    ///
    /// Absence is a normal outcome: records contributed by plugins outside
    /// the order are simply excluded from chains.
    #[must_use]
    pub fn position(&self, plugin: &PluginName) -> Option<usize> {
        self.positions.get(plugin).copied()
    }

    /// Returns `true` if the plugin is part of the order.
    #[must_use]
    pub fn contains(&self, plugin: &PluginName) -> bool {
        self.positions.contains_key(plugin)
    }

    /// The first `n` plugins of the order (the "base" set used to pre-filter
    /// attribution). `n` may exceed the order length; the result is clamped.
    #[must_use]
    pub fn base_set(&self, n: usize) -> &[PluginName] {
        &self.plugins[..n.min(self.plugins.len())]
    }

    /// Iterate plugins in ascending priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, PluginName> {
        self.plugins.iter()
    }

    /// Number of plugins in the order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<'a> IntoIterator for &'a LoadOrder {
    type Item = &'a PluginName;
    type IntoIter = std::slice::Iter<'a, PluginName>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<PluginName>> for LoadOrder {
    type Error = LoadOrderError;
    fn try_from(plugins: Vec<PluginName>) -> Result<Self, Self::Error> {
        Self::new(plugins)
    }
}

impl From<LoadOrder> for Vec<PluginName> {
    fn from(order: LoadOrder) -> Self {
        order.plugins
    }
}

// ---------------------------------------------------------------------------
// LoadOrderError
// ---------------------------------------------------------------------------

/// An error building a [`LoadOrder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOrderError {
    /// A plugin appeared more than once in the order.
    Duplicate {
        /// The duplicated plugin name.
        plugin: PluginName,
    },
}

impl fmt::Display for LoadOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { plugin } => {
                write!(f, "plugin '{plugin}' appears more than once in the load order")
            }
        }
    }
}

impl std::error::Error for LoadOrderError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
