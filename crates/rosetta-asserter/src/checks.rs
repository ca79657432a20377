//! Structural checks on individual pieces of a capability declaration.
//!
//! Each check is independent and stateless. [`crate::Asserter`] runs them in a
//! fixed order and stops at the first failure.

use std::collections::{HashMap, HashSet};

use rosetta_types::{ApiError, BlockIdentifier, NetworkIdentifier, OperationStatus, Peer, Version};
use tracing::warn;

use crate::error::{AsserterError, Result};

pub(crate) const OPERATION_STATUSES: &str = "allow.operation_statuses";
pub(crate) const OPERATION_TYPES: &str = "allow.operation_types";
pub(crate) const ERRORS: &str = "allow.errors";

/// Require non-empty `blockchain` and `network`, and a non-empty sub-network
/// name when one is given.
pub fn network_identifier(network: &NetworkIdentifier) -> Result<()> {
    if network.blockchain.is_empty() {
        return Err(AsserterError::MissingField(
            "network_identifier.blockchain",
        ));
    }
    if network.network.is_empty() {
        return Err(AsserterError::MissingField("network_identifier.network"));
    }
    if let Some(sub) = &network.sub_network_identifier {
        if sub.network.is_empty() {
            return Err(AsserterError::MissingField(
                "network_identifier.sub_network_identifier.network",
            ));
        }
    }
    Ok(())
}

/// Require a present block reference with a non-negative index and a hash.
pub fn block_identifier<'a>(
    field: &'static str,
    block: Option<&'a BlockIdentifier>,
) -> Result<&'a BlockIdentifier> {
    let block = block.ok_or(AsserterError::MissingField(field))?;
    if block.index < 0 {
        return Err(AsserterError::ImplausibleValue {
            field,
            reason: format!("negative index {}", block.index),
        });
    }
    if block.hash.is_empty() {
        return Err(AsserterError::ImplausibleValue {
            field,
            reason: format!("empty hash at index {}", block.index),
        });
    }
    Ok(block)
}

/// Require a timestamp strictly after `min_unix_epoch` (both in ms).
pub fn timestamp(timestamp: i64, min_unix_epoch: i64) -> Result<()> {
    if timestamp <= min_unix_epoch {
        return Err(AsserterError::ImplausibleValue {
            field: "current_block_timestamp",
            reason: format!("{timestamp} is at or before {min_unix_epoch}"),
        });
    }
    Ok(())
}

pub fn peers(peers: &[Peer]) -> Result<()> {
    if let Some(position) = peers.iter().position(|peer| peer.peer_id.is_empty()) {
        return Err(AsserterError::ImplausibleValue {
            field: "peers",
            reason: format!("peer {position} has an empty peer_id"),
        });
    }
    Ok(())
}

pub fn version(version: Option<&Version>) -> Result<()> {
    let version = version.ok_or(AsserterError::MissingField("version"))?;
    if version.rosetta_version.is_empty() {
        return Err(AsserterError::MissingField("version.rosetta_version"));
    }
    if version.node_version.is_empty() {
        return Err(AsserterError::MissingField("version.node_version"));
    }
    Ok(())
}

/// Index operation statuses by status string.
///
/// The list must be non-empty. Two entries with the same status string are
/// rejected regardless of their `successful` flag; the first repeated value
/// in declaration order is reported.
pub fn operation_statuses(statuses: &[OperationStatus]) -> Result<HashMap<String, bool>> {
    if statuses.is_empty() {
        return Err(AsserterError::EmptyRequiredSet(OPERATION_STATUSES));
    }

    let mut out = HashMap::with_capacity(statuses.len());
    for status in statuses {
        if status.status.is_empty() {
            return Err(AsserterError::ImplausibleValue {
                field: OPERATION_STATUSES,
                reason: "empty status".to_string(),
            });
        }
        if out
            .insert(status.status.clone(), status.successful)
            .is_some()
        {
            return Err(AsserterError::DuplicateEntry {
                list: OPERATION_STATUSES,
                value: status.status.clone(),
            });
        }
    }
    Ok(out)
}

/// Collect operation types into a set, reporting the first repeated value.
pub fn operation_types(types: &[String]) -> Result<HashSet<String>> {
    let mut out = HashSet::with_capacity(types.len());
    for kind in types {
        if kind.is_empty() {
            return Err(AsserterError::ImplausibleValue {
                field: OPERATION_TYPES,
                reason: "empty operation type".to_string(),
            });
        }
        if !out.insert(kind.clone()) {
            return Err(AsserterError::DuplicateEntry {
                list: OPERATION_TYPES,
                value: kind.clone(),
            });
        }
    }
    Ok(out)
}

/// Index declared errors by code.
///
/// Codes may repeat across distinct messages. A repeat is logged, not
/// rejected.
pub fn errors(errors: &[ApiError]) -> Result<HashMap<i32, Vec<ApiError>>> {
    let mut out: HashMap<i32, Vec<ApiError>> = HashMap::with_capacity(errors.len());
    for err in errors {
        if err.code < 0 {
            return Err(AsserterError::ImplausibleValue {
                field: ERRORS,
                reason: format!("negative code {}", err.code),
            });
        }
        if err.message.is_empty() {
            return Err(AsserterError::ImplausibleValue {
                field: ERRORS,
                reason: format!("code {} has an empty message", err.code),
            });
        }

        let entries = out.entry(err.code).or_default();
        if !entries.is_empty() {
            warn!(code = err.code, error_message = %err.message, "duplicate error code declared");
        }
        if !entries.contains(err) {
            entries.push(err.clone());
        }
    }
    Ok(out)
}
