//! In-process store backend

use std::sync::RwLock;

use ahash::AHashMap;

use super::{StateStore, StoreKey};
use crate::core::error::{Result, SiegeError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<AHashMap<StoreKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> SiegeError {
    SiegeError::Store("memory store lock poisoned".into())
}

impl StateStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: StoreKey, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key, value);
        Ok(())
    }

    fn exists(&self, key: &StoreKey) -> Result<bool> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.contains_key(key))
    }
}
