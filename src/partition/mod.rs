//! Shared-resource partitioning: usage classification and clone-and-rewrite.

pub mod classify;
pub mod rewrite;

pub use classify::{AmbiguousGender, ClassSet, UsageClass, classes_of, classify, shared_ids};
pub use rewrite::{ClonePlan, RewriteStats, build_plan, rewrite};
