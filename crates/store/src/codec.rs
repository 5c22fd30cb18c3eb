use serde::de::DeserializeOwned;
use serde::Serialize;
use visionary_common::{Result, VisionaryError};

use crate::kv::KeyValueStore;

/// Read a JSON value, treating an absent key as the default value
pub(crate) fn read_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        None => Ok(T::default()),
        Some(raw) if raw.trim().is_empty() => Ok(T::default()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            VisionaryError::storage(format!("Corrupt value under {}: {}", key, e))
        }),
    }
}

/// Encode and write a JSON value as a whole
pub(crate) fn write_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let data = serde_json::to_string(value)?;
    store.set(key, &data)
}
