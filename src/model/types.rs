//! Core identity types for loadstone.
//!
//! Foundation types used throughout loadstone: plugin names (the ordered
//! sources of the load order) and form ids (the stable identity of one
//! logical record across all sources and overrides).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PluginName
// ---------------------------------------------------------------------------

/// A validated plugin name — one ordered contributor in the load sequence.
///
/// Plugin names are compared case-insensitively on disk, so they are
/// normalized to ASCII lowercase at construction. Non-empty, at most 255
/// characters, no path separators or control characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginName(String);

impl PluginName {
    /// The maximum length of a plugin name.
    pub const MAX_LEN: usize = 255;

    /// Create a new `PluginName`, validating and normalizing to lowercase.
    ///
    /// # Errors
    /// Returns an error if the name is empty, too long, or contains a path
    /// separator or control character.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::validate(s)?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Return the normalized (lowercase) name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.is_empty() {
            return Err(ValidationError {
                kind: ErrorKind::PluginName,
                value: s.to_owned(),
                reason: "plugin name must not be empty".to_owned(),
            });
        }
        if s.len() > Self::MAX_LEN {
            return Err(ValidationError {
                kind: ErrorKind::PluginName,
                value: s.to_owned(),
                reason: format!(
                    "plugin name must be at most {} characters, got {}",
                    Self::MAX_LEN,
                    s.len()
                ),
            });
        }
        if s.contains(['/', '\\']) {
            return Err(ValidationError {
                kind: ErrorKind::PluginName,
                value: s.to_owned(),
                reason: "plugin name must not contain path separators".to_owned(),
            });
        }
        if s.chars().any(char::is_control) {
            return Err(ValidationError {
                kind: ErrorKind::PluginName,
                value: s.to_owned(),
                reason: "plugin name must not contain control characters".to_owned(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for PluginName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PluginName {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PluginName {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<PluginName> for String {
    fn from(name: PluginName) -> Self {
        name.0
    }
}

// ---------------------------------------------------------------------------
// FormId
// ---------------------------------------------------------------------------

/// The stable identity of one logical record across all sources.
///
/// A form id is the originating plugin plus a 24-bit record index. Two
/// versions with the same `FormId` are the same logical entity at different
/// points in override history; the id never changes when a later plugin
/// overrides the record.
///
/// Textual form: `XXXXXX:plugin.esp` (uppercase hex index, then the plugin).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormId {
    plugin: PluginName,
    index: u32,
}

impl FormId {
    /// The maximum record index (24 bits).
    pub const MAX_INDEX: u32 = 0x00FF_FFFF;

    /// Create a new `FormId` from an originating plugin and record index.
    ///
    /// # Errors
    /// Returns an error if the index exceeds 24 bits.
    pub fn new(plugin: PluginName, index: u32) -> Result<Self, ValidationError> {
        if index > Self::MAX_INDEX {
            return Err(ValidationError {
                kind: ErrorKind::FormId,
                value: format!("{index:08X}"),
                reason: format!(
                    "record index must fit in 24 bits (max {:06X})",
                    Self::MAX_INDEX
                ),
            });
        }
        Ok(Self { plugin, index })
    }

    /// The plugin this record originates from.
    #[must_use]
    pub const fn plugin(&self) -> &PluginName {
        &self.plugin
    }

    /// The 24-bit record index within the originating plugin.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError {
            kind: ErrorKind::FormId,
            value: s.to_owned(),
            reason,
        };
        let (hex, plugin) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected 'XXXXXX:plugin' form".to_owned()))?;
        if hex.len() != 6 {
            return Err(invalid(format!(
                "expected 6 hex characters before ':', got {}",
                hex.len()
            )));
        }
        let index = u32::from_str_radix(hex, 16)
            .map_err(|_| invalid("index must be hexadecimal".to_owned()))?;
        let plugin = PluginName::new(plugin).map_err(|e| invalid(e.reason))?;
        Self::new(plugin, index)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.index, self.plugin)
    }
}

impl FromStr for FormId {
    type Err = ValidationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FormId {
    type Error = ValidationError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FormId> for String {
    fn from(id: FormId) -> Self {
        id.to_string()
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// The kind of value that failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A [`PluginName`] validation error.
    PluginName,
    /// A [`FormId`] validation error.
    FormId,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PluginName => write!(f, "PluginName"),
            Self::FormId => write!(f, "FormId"),
        }
    }
}

/// A validation error for loadstone identity types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// What kind of value was being validated.
    pub kind: ErrorKind,
    /// The invalid value.
    pub value: String,
    /// Human-readable explanation.
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {}: {:?} — {}",
            self.kind, self.value, self.reason
        )
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
