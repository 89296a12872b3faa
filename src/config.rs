//! Run configuration (`loadstone.toml`).
//!
//! Typed configuration for a run: which plugins' leveled-list changes to
//! attribute, how many leading plugins form the "base" set, and how the
//! partition phase treats gender. Missing file → all defaults (no error);
//! an empty `tracked` table simply skips the attribution phase.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::types::PluginName;
use crate::partition::classify::{AmbiguousGender, UsageClass};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level loadstone configuration, parsed from `loadstone.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[derive(Default)]
pub struct LoadstoneConfig {
    /// Attribution settings.
    #[serde(default)]
    pub attribution: AttributionConfig,

    /// Partition settings.
    #[serde(default)]
    pub partition: PartitionConfig,

    /// Patch output settings.
    #[serde(default)]
    pub patch: PatchConfig,
}

impl LoadstoneConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError {
            path: Some(path.to_path_buf()),
            message: format!("cannot read config: {e}"),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError {
            path: Some(path.to_path_buf()),
            message: format!("cannot parse config: {e}"),
        })
    }
}

// ---------------------------------------------------------------------------
// AttributionConfig
// ---------------------------------------------------------------------------

/// Which plugins' leveled-list contributions to attribute.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributionConfig {
    /// How many leading plugins of the load order form the "base" set.
    /// Only records originating in a base plugin are attributed.
    #[serde(default = "default_base_plugins")]
    pub base_plugins: usize,

    /// Tracked designated plugins: human-readable label → plugin name.
    /// One entry per tracked leveled-list source. Empty → attribution
    /// phase is skipped.
    #[serde(default)]
    pub tracked: BTreeMap<String, PluginName>,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            base_plugins: default_base_plugins(),
            tracked: BTreeMap::new(),
        }
    }
}

const fn default_base_plugins() -> usize {
    4
}

// ---------------------------------------------------------------------------
// PartitionConfig
// ---------------------------------------------------------------------------

/// How the partition phase selects and splits.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
    /// The class whose consumers are rewritten onto clones. The other class
    /// keeps the originals.
    #[serde(default = "default_class")]
    pub class: UsageClass,

    /// How to classify NPCs that carry no gender flag.
    #[serde(default)]
    pub ambiguous_gender: AmbiguousGender,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            class: default_class(),
            ambiguous_gender: AmbiguousGender::default(),
        }
    }
}

const fn default_class() -> UsageClass {
    UsageClass::Male
}

// ---------------------------------------------------------------------------
// PatchConfig
// ---------------------------------------------------------------------------

/// Patch output settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    /// Plugin name new records and overrides are written under.
    #[serde(default = "default_patch_plugin")]
    pub plugin: PluginName,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            plugin: default_patch_plugin(),
        }
    }
}

fn default_patch_plugin() -> PluginName {
    // The literal is a valid plugin name; construction cannot fail.
    PluginName::new("loadstone patch.esp").unwrap_or_else(|_| unreachable!())
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration file that could not be loaded or parsed.
#[derive(Clone, Debug)]
pub struct ConfigError {
    /// Path to the configuration file, if known.
    pub path: Option<PathBuf>,
    /// Human-readable description of the problem.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "config '{}': {}", path.display(), self.message),
            None => write!(f, "config: {}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
