//! Field deserializers for model replies, where `null`, odd casing and
//! unknown labels are common and must not sink the whole object.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` reads the same as a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON value; non-strings become `None`, strings are trimmed and
/// lowercased.
pub(crate) fn label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(Value::as_str)
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty()))
}
