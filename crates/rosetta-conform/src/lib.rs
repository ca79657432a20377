//! Conformance checks for Rosetta servers against their declared capabilities.
//!
//! # Crate Structure
//!
//! - [`types`] - Wire shapes for `/network/status` and `/network/options`
//! - [`asserter`] - Capability validation and response checks (behind `asserter` feature)

/// Re-export wire types.
pub mod types {
    pub use rosetta_types::*;
}

/// Re-export asserter types (requires `asserter` feature).
#[cfg(feature = "asserter")]
pub mod asserter {
    pub use rosetta_asserter::*;
}
