//! Persisted capability snapshot.
//!
//! A snapshot holds what an [`crate::Asserter`] needs so a client can start a
//! session without a live `/network/options` round-trip.

use std::io::Read;
use std::path::Path;

use rosetta_types::{nullable, ApiError, BlockIdentifier, NetworkIdentifier, OperationStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AsserterConfig;
use crate::error::{AsserterError, Result};

/// On-disk layout of a capability snapshot (JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfiguration {
    #[serde(default)]
    pub network_identifier: Option<NetworkIdentifier>,
    #[serde(default)]
    pub genesis_block_identifier: Option<BlockIdentifier>,
    #[serde(default, deserialize_with = "nullable::vec")]
    pub allowed_operation_types: Vec<String>,
    #[serde(default, deserialize_with = "nullable::vec")]
    pub allowed_operation_statuses: Vec<OperationStatus>,
    #[serde(default, deserialize_with = "nullable::vec")]
    pub allowed_errors: Vec<ApiError>,
}

impl FileConfiguration {
    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| AsserterError::SnapshotLoad(err.to_string()))
    }

    /// Read a snapshot file with default config.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_config(path, &AsserterConfig::default())
    }

    /// Read a snapshot file, refusing anything over `config.max_snapshot_size`.
    pub fn load_with_config(path: &Path, config: &AsserterConfig) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|err| {
            AsserterError::SnapshotLoad(format!("failed opening {}: {err}", path.display()))
        })?;
        let metadata = file
            .metadata()
            .map_err(|err| AsserterError::SnapshotLoad(err.to_string()))?;
        if !metadata.is_file() {
            return Err(AsserterError::SnapshotLoad(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let max_bytes = config.max_snapshot_size;
        if metadata.len() > max_bytes as u64 {
            return Err(AsserterError::SnapshotLoad(format!(
                "snapshot too large ({} bytes, max {max_bytes}): {}",
                metadata.len(),
                path.display()
            )));
        }

        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                AsserterError::SnapshotLoad(format!("failed reading {}: {err}", path.display()))
            })?;
        if content.len() > max_bytes {
            return Err(AsserterError::SnapshotLoad(format!(
                "snapshot too large while reading: {}",
                path.display()
            )));
        }

        let snapshot = serde_json::from_str(&content).map_err(|err| {
            AsserterError::SnapshotLoad(format!("failed parsing {}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded capability snapshot");
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|err| AsserterError::SnapshotWrite(err.to_string()))?;
        std::fs::write(path, json).map_err(|err| {
            AsserterError::SnapshotWrite(format!("failed writing {}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), "wrote capability snapshot");
        Ok(())
    }
}
