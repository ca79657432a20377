//! Network and block identifiers.

use serde::{Deserialize, Serialize};

/// Identifies the blockchain and network a server is running.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    /// Chain name, e.g. `bitcoin`.
    pub blockchain: String,
    /// Network name within the chain, e.g. `mainnet`.
    pub network: String,
    /// Optional shard or sub-network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_network_identifier: Option<SubNetworkIdentifier>,
}

impl NetworkIdentifier {
    /// Build an identifier without a sub-network.
    pub fn new(blockchain: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            blockchain: blockchain.into(),
            network: network.into(),
            sub_network_identifier: None,
        }
    }
}

/// Shard or sub-network within a [`NetworkIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubNetworkIdentifier {
    pub network: String,
}

/// Points at a single block by height and hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockIdentifier {
    /// Block height. Never negative on a well-formed server.
    pub index: i64,
    pub hash: String,
}

impl BlockIdentifier {
    pub fn new(index: i64, hash: impl Into<String>) -> Self {
        Self {
            index,
            hash: hash.into(),
        }
    }
}
