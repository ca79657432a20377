//! `/network/status` and `/network/options` response bodies.

use serde::{Deserialize, Serialize};

use crate::allow::Allow;
use crate::identifiers::BlockIdentifier;
use crate::nullable;

/// Current chain state reported by a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatusResponse {
    #[serde(default)]
    pub current_block_identifier: Option<BlockIdentifier>,
    /// Milliseconds since the Unix epoch.
    pub current_block_timestamp: i64,
    #[serde(default)]
    pub genesis_block_identifier: Option<BlockIdentifier>,
    #[serde(default, deserialize_with = "nullable::vec")]
    pub peers: Vec<Peer>,
}

/// A peer the server is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub peer_id: String,
}

impl Peer {
    pub fn new(peer_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
        }
    }
}

/// Software versions plus the server's allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOptionsResponse {
    #[serde(default)]
    pub version: Option<Version>,
    #[serde(default)]
    pub allow: Option<Allow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Rosetta API version the server implements.
    pub rosetta_version: String,
    /// Version of the node software behind the server.
    pub node_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware_version: Option<String>,
}
