//! Serde helpers for fields servers may send as `null`.

use serde::{Deserialize, Deserializer};

/// Deserialize a list that servers may send as `null` instead of `[]`.
pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
