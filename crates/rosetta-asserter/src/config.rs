/// Earliest plausible block timestamp, in milliseconds since the Unix epoch
/// (2000-01-01T08:00:00Z). Anything at or before this is a placeholder.
pub const MIN_UNIX_EPOCH: i64 = 946_713_600_000;

/// Controls asserter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsserterConfig {
    /// Current block timestamps must be strictly greater than this (ms).
    pub min_unix_epoch: i64,
    /// Maximum bytes read from a snapshot file.
    pub max_snapshot_size: usize,
}

impl Default for AsserterConfig {
    fn default() -> Self {
        Self {
            min_unix_epoch: MIN_UNIX_EPOCH,
            max_snapshot_size: 256 * 1024,
        }
    }
}
