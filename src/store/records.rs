//! Typed record encoding over a `StateStore`

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{StateStore, StoreKey};
use crate::core::error::Result;

/// Encode a record as JSON bytes
pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

/// Read and decode a record, `None` if the key is absent
pub fn read<T: DeserializeOwned>(store: &dyn StateStore, key: &StoreKey) -> Result<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Like `read`, also handing back the stored bytes so a failed update can
/// put them back exactly
pub fn read_with_bytes<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &StoreKey,
) -> Result<Option<(T, Vec<u8>)>> {
    match store.get(key)? {
        Some(bytes) => {
            let record = serde_json::from_slice(&bytes)?;
            Ok(Some((record, bytes)))
        }
        None => Ok(None),
    }
}
