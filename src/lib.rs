//! loadstone library crate — re-exports for integration tests.
//!
//! The primary interface is the `loadstone` binary. This lib.rs exposes the
//! internal modules so that integration tests can exercise the resolver,
//! differ, classifier, and rewriter directly without going through the CLI.

pub mod config;
pub mod error;
pub mod model;
pub mod partition;
pub mod pipeline;
pub mod resolve;
pub mod store;
pub mod telemetry;
