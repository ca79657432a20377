//! Validate Rosetta server responses against the server's declared capabilities.
//!
//! Build an [`Asserter`] once per client session from `/network/status` and
//! `/network/options` (or from a persisted [`FileConfiguration`]). Construction
//! rejects malformed declarations; afterwards every operation status, type,
//! and error the server returns can be checked for membership in what it
//! declared.

pub mod asserter;
pub mod checks;
pub mod config;
pub mod error;
pub mod snapshot;

pub use asserter::{Asserter, ClientConfiguration};
pub use config::{AsserterConfig, MIN_UNIX_EPOCH};
pub use error::{AsserterError, Result};
pub use snapshot::FileConfiguration;
