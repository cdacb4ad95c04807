//! Key-value state store seam
//!
//! The engine keeps its records behind this trait: one game-wide record
//! and one record per registered principal. Values are opaque bytes;
//! `records` turns them into typed state.

pub mod memory;
pub mod records;

pub use memory::MemoryStore;

use crate::core::error::Result;
use crate::core::types::PrincipalId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// The game-wide singleton record
    Game,
    /// One registered player
    Player(PrincipalId),
}

impl StoreKey {
    pub fn player(id: &PrincipalId) -> Self {
        Self::Player(id.clone())
    }
}

/// Durable key-value storage supplied by the host
///
/// Each call is atomic for its one key. Anything spanning several keys is
/// serialized by the engine's own locks.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: StoreKey, value: Vec<u8>) -> Result<()>;
    fn exists(&self, key: &StoreKey) -> Result<bool>;
}
