pub mod account;
pub mod event;
pub mod task;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent patch field (`None`) from an explicit `null`
/// (`Some(None)`) when used with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
