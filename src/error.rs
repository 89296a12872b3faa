//! Unified error type for loadstone runs.
//!
//! Only unrecoverable conditions become errors. The taxonomy from the run's
//! point of view:
//!
//! - **Lookup misses** (unknown id, plugin not in a chain) are sentinel
//!   values (`None`, empty chain), never errors.
//! - **Malformed configuration targets** (a tracked plugin that is not in
//!   the load order) and **clone failures** are recovered per-target with a
//!   warning; the run continues and exits zero.
//! - **Store unavailability** (snapshot missing/unreadable) and unparsable
//!   configuration are fatal: no downstream phase can proceed.

use std::fmt;

use crate::config::ConfigError;
use crate::store::SnapshotError;

// ---------------------------------------------------------------------------
// LoadstoneError
// ---------------------------------------------------------------------------

/// A fatal error terminating the run with non-zero status.
///
/// Each variant is self-contained: the message identifies the unreachable
/// collaborator or broken input and what to do about it.
#[derive(Debug)]
pub enum LoadstoneError {
    /// The record-store snapshot could not be loaded — the store is
    /// unavailable and nothing downstream can run.
    StoreUnavailable(SnapshotError),

    /// The configuration file exists but could not be parsed.
    Config(ConfigError),

    /// An I/O error writing run output.
    Io(std::io::Error),
}

impl fmt::Display for LoadstoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreUnavailable(err) => {
                write!(
                    f,
                    "record store unavailable: {err}\n  To fix: check the snapshot path and regenerate it from the host pipeline."
                )
            }
            Self::Config(err) => {
                write!(
                    f,
                    "{err}\n  To fix: edit the config file and correct the issue."
                )
            }
            Self::Io(err) => {
                write!(
                    f,
                    "I/O error: {err}\n  To fix: check file permissions and disk space."
                )
            }
        }
    }
}

impl std::error::Error for LoadstoneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for LoadstoneError {
    fn from(err: SnapshotError) -> Self {
        Self::StoreUnavailable(err)
    }
}

impl From<ConfigError> for LoadstoneError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for LoadstoneError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::all, clippy::pedantic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_store_unavailable() {
        let err = LoadstoneError::StoreUnavailable(SnapshotError {
            path: Some(PathBuf::from("plugins.json")),
            detail: "cannot read snapshot: no such file".to_owned(),
        });
        let msg = format!("{err}");
        assert!(msg.contains("record store unavailable"));
        assert!(msg.contains("plugins.json"));
        assert!(msg.contains("To fix"));
    }

    #[test]
    fn display_config() {
        let err = LoadstoneError::Config(ConfigError {
            path: Some(PathBuf::from("loadstone.toml")),
            message: "cannot parse config: expected value".to_owned(),
        });
        let msg = format!("{err}");
        assert!(msg.contains("loadstone.toml"));
        assert!(msg.contains("edit the config file"));
    }

    #[test]
    fn display_io() {
        let err = LoadstoneError::Io(std::io::Error::other("disk full"));
        let msg = format!("{err}");
        assert!(msg.contains("disk full"));
        assert!(msg.contains("file permissions"));
    }

    #[test]
    fn sources_are_chained() {
        let err = LoadstoneError::StoreUnavailable(SnapshotError {
            path: None,
            detail: "gone".to_owned(),
        });
        assert!(std::error::Error::source(&err).is_some());
    }
}
