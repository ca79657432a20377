//! Wire message shapes for Rosetta network capability negotiation.
//!
//! These are plain data carriers. They describe what a server sends on
//! `/network/status` and `/network/options`; nothing here checks whether
//! the contents make sense. That is the job of `rosetta-asserter`.

pub mod allow;
pub mod identifiers;
pub mod network;
pub mod nullable;

pub use allow::{Allow, ApiError, OperationStatus};
pub use identifiers::{BlockIdentifier, NetworkIdentifier, SubNetworkIdentifier};
pub use network::{NetworkOptionsResponse, NetworkStatusResponse, Peer, Version};
