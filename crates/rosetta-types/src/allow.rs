//! The allow-lists a server declares on `/network/options`.

use serde::{Deserialize, Serialize};

use crate::nullable;

/// Supported operation statuses, operation types, and every error a server
/// may return. Clients reject any response that uses a value not listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allow {
    /// Every `Operation.status` the server may emit.
    #[serde(default, deserialize_with = "nullable::vec")]
    pub operation_statuses: Vec<OperationStatus>,
    /// Every `Operation.type` the server may emit.
    #[serde(default, deserialize_with = "nullable::vec")]
    pub operation_types: Vec<String>,
    /// Every error the server may return.
    #[serde(default, deserialize_with = "nullable::vec")]
    pub errors: Vec<ApiError>,
    /// True when account balances can be queried at any past height.
    #[serde(default)]
    pub historical_balance_lookup: bool,
}

/// A status an operation can end up in, and whether it counts as success.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationStatus {
    pub status: String,
    pub successful: bool,
}

impl OperationStatus {
    pub fn new(status: impl Into<String>, successful: bool) -> Self {
        Self {
            status: status.into(),
            successful,
        }
    }
}

/// An error shape a server may return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiError {
    /// Server-specific error code. Non-negative.
    pub code: i32,
    /// Fixed message for this code.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the same request may succeed if retried.
    pub retriable: bool,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>, retriable: bool) -> Self {
        Self {
            code,
            message: message.into(),
            description: None,
            retriable,
        }
    }
}
