//! Override resolution: version chains, semantic diffing, and attribution.

pub mod attribution;
pub mod chain;
pub mod diff;

pub use attribution::{Attribution, attribute, attribute_in_base};
pub use chain::{Versioned, position_of, resolve_chain, winner};
pub use diff::equivalent;
