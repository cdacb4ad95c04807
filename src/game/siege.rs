//! Siege engine - owns the locks and the collaborators
//!
//! Lock order is fixed: the game lock first, then at most one player lock
//! at a time. Player operations that never touch shared state (mobilize)
//! take only their own player lock.

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;

use crate::combat::BonusSource;
use crate::core::clock::Clock;
use crate::core::config::GameConfig;
use crate::core::error::{Result, SiegeError};
use crate::core::types::{GameTurn, PrincipalId, Timestamp};
use crate::game::castle::CastleState;
use crate::game::leaderboard::Leaderboard;
use crate::game::player::PlayerState;
use crate::game::state::GameState;
use crate::store::records::{encode, read, read_with_bytes};
use crate::store::{StateStore, StoreKey};

/// External services the engine runs against
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn StateStore>,
    pub clock: Arc<dyn Clock>,
    pub bonus: Arc<dyn BonusSource>,
}

/// Guards hold no data, so a panic elsewhere cannot leave them inconsistent
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A record ready to be written, with the bytes it replaces
///
/// `previous` is `None` when the key is new. The store has no delete, so a
/// new key cannot be rolled back and must be written first.
#[derive(Debug)]
pub(crate) struct StagedWrite {
    pub(crate) key: StoreKey,
    pub(crate) bytes: Vec<u8>,
    pub(crate) previous: Option<Vec<u8>>,
}

/// One mutex per principal, created on first use
#[derive(Debug, Default)]
pub(crate) struct PlayerLocks {
    locks: Mutex<AHashMap<PrincipalId, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    pub(crate) fn handle(&self, player: &PrincipalId) -> Arc<Mutex<()>> {
        let mut locks = lock(&self.locks);
        locks.entry(player.clone()).or_default().clone()
    }
}

/// The game engine
pub struct Siege {
    pub(crate) config: GameConfig,
    pub(crate) store: Arc<dyn StateStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) bonus: Arc<dyn BonusSource>,
    pub(crate) game_lock: Mutex<()>,
    pub(crate) player_locks: PlayerLocks,
}

impl Siege {
    /// Start a new game on an empty store with `genesis_king` on the throne
    pub fn genesis(
        config: GameConfig,
        genesis_king: PrincipalId,
        collaborators: Collaborators,
    ) -> Result<Self> {
        config.validate()?;
        let siege = Self::assemble(config, collaborators);

        if siege.store.exists(&StoreKey::Game)? {
            return Err(SiegeError::AlreadyInitialized);
        }

        let now = siege.clock.now();
        let state = GameState::genesis(genesis_king.clone(), siege.config.default_army, now);
        siege.store.put(StoreKey::Game, encode(&state)?)?;

        tracing::info!(king = %genesis_king, time = now, "Castle founded");
        Ok(siege)
    }

    /// Reattach to a store that already holds a game
    pub fn open(config: GameConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let siege = Self::assemble(config, collaborators);
        let state = siege.load_game()?;
        tracing::info!(
            king = %state.castle.king,
            game_turn = state.game_turn,
            players = state.registered_players.len(),
            "Siege reopened"
        );
        Ok(siege)
    }

    fn assemble(config: GameConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            store: collaborators.store,
            clock: collaborators.clock,
            bonus: collaborators.bonus,
            game_lock: Mutex::new(()),
            player_locks: PlayerLocks::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub(crate) fn load_game(&self) -> Result<GameState> {
        read(self.store.as_ref(), &StoreKey::Game)?.ok_or(SiegeError::NotInitialized)
    }

    pub(crate) fn load_player(&self, player: &PrincipalId) -> Result<PlayerState> {
        read(self.store.as_ref(), &StoreKey::player(player))?
            .ok_or_else(|| SiegeError::NotJoined(player.clone()))
    }

    pub(crate) fn load_game_with_bytes(&self) -> Result<(GameState, Vec<u8>)> {
        read_with_bytes(self.store.as_ref(), &StoreKey::Game)?.ok_or(SiegeError::NotInitialized)
    }

    pub(crate) fn load_player_with_bytes(
        &self,
        player: &PrincipalId,
    ) -> Result<(PlayerState, Vec<u8>)> {
        read_with_bytes(self.store.as_ref(), &StoreKey::player(player))?
            .ok_or_else(|| SiegeError::NotJoined(player.clone()))
    }

    /// Write staged records in order, all or nothing
    ///
    /// If a put fails, every record already written is restored from its
    /// previous bytes, newest first, and the original error is returned.
    pub(crate) fn commit(&self, writes: Vec<StagedWrite>) -> Result<()> {
        for (index, write) in writes.iter().enumerate() {
            if let Err(err) = self.store.put(write.key.clone(), write.bytes.clone()) {
                self.roll_back(&writes[..index]);
                return Err(err);
            }
        }
        Ok(())
    }

    fn roll_back(&self, written: &[StagedWrite]) {
        for write in written.iter().rev() {
            let Some(previous) = &write.previous else {
                continue;
            };
            if let Err(err) = self.store.put(write.key.clone(), previous.clone()) {
                tracing::error!(key = ?write.key, error = %err, "Rollback failed");
            }
        }
        tracing::warn!(records = written.len(), "Rolled back partial write");
    }

    pub(crate) fn ensure_joined(&self, player: &PrincipalId) -> Result<()> {
        if !self.store.exists(&StoreKey::player(player))? {
            return Err(SiegeError::NotJoined(player.clone()));
        }
        Ok(())
    }

    // === QUERIES ===

    /// Full game-wide record
    pub fn snapshot(&self) -> Result<GameState> {
        self.load_game()
    }

    pub fn castle(&self) -> Result<CastleState> {
        Ok(self.load_game()?.castle)
    }

    pub fn player(&self, player: &PrincipalId) -> Result<PlayerState> {
        self.load_player(player)
    }

    pub fn is_joined(&self, player: &PrincipalId) -> Result<bool> {
        self.store.exists(&StoreKey::player(player))
    }

    pub fn last_tick_time(&self) -> Result<Timestamp> {
        Ok(self.load_game()?.last_tick_time)
    }

    pub fn last_king_change_time(&self) -> Result<Timestamp> {
        Ok(self.load_game()?.castle.last_king_change_time)
    }

    pub fn top_score(&self) -> Result<Leaderboard> {
        Ok(self.load_game()?.leaderboard)
    }

    pub fn game_turn(&self) -> Result<GameTurn> {
        Ok(self.load_game()?.game_turn)
    }

    pub fn number_of_attacks(&self) -> Result<u64> {
        Ok(self.load_game()?.number_of_attacks)
    }

    /// Registered players in join order
    pub fn roster(&self) -> Result<Vec<PrincipalId>> {
        Ok(self.load_game()?.registered_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::Army;
    use crate::combat::{FixedBonus, WeatherCondition};
    use crate::core::clock::ManualClock;
    use crate::store::MemoryStore;

    fn collaborators(store: Arc<MemoryStore>) -> Collaborators {
        Collaborators {
            store,
            clock: Arc::new(ManualClock::new(1000)),
            bonus: Arc::new(FixedBonus(100)),
        }
    }

    #[test]
    fn test_genesis_writes_initial_state() {
        let store = Arc::new(MemoryStore::new());
        let siege = Siege::genesis(
            GameConfig::default(),
            PrincipalId::new("founder"),
            collaborators(store.clone()),
        )
        .unwrap();

        let castle = siege.castle().unwrap();
        assert_eq!(castle.king, PrincipalId::new("founder"));
        assert_eq!(castle.defense, Army::new(500, 500, 500));
        assert_eq!(castle.weather, WeatherCondition::Clear);
        assert_eq!(siege.last_tick_time().unwrap(), 1000);
        assert_eq!(siege.game_turn().unwrap(), 0);
        assert!(siege.roster().unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_genesis_twice_rejected() {
        let store = Arc::new(MemoryStore::new());
        Siege::genesis(GameConfig::default(), PrincipalId::new("a"), collaborators(store.clone()))
            .unwrap();
        let second =
            Siege::genesis(GameConfig::default(), PrincipalId::new("b"), collaborators(store));
        assert!(matches!(second, Err(SiegeError::AlreadyInitialized)));
    }

    #[test]
    fn test_open_empty_store_rejected() {
        let store = Arc::new(MemoryStore::new());
        let result = Siege::open(GameConfig::default(), collaborators(store));
        assert!(matches!(result, Err(SiegeError::NotInitialized)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            tick_interval_secs: 0,
            ..GameConfig::default()
        };
        let store = Arc::new(MemoryStore::new());
        let result = Siege::genesis(config, PrincipalId::new("a"), collaborators(store.clone()));
        assert!(matches!(result, Err(SiegeError::InvalidConfig(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_player_query() {
        let store = Arc::new(MemoryStore::new());
        let siege =
            Siege::genesis(GameConfig::default(), PrincipalId::new("a"), collaborators(store))
                .unwrap();
        let result = siege.player(&PrincipalId::new("ghost"));
        assert!(matches!(result, Err(SiegeError::NotJoined(_))));
        assert!(!siege.is_joined(&PrincipalId::new("ghost")).unwrap());
    }

    /// Memory store that refuses writes to one key
    struct RefusingStore {
        inner: MemoryStore,
        refused: StoreKey,
    }

    impl StateStore for RefusingStore {
        fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn put(&self, key: StoreKey, value: Vec<u8>) -> Result<()> {
            if key == self.refused {
                return Err(SiegeError::Store("write refused".into()));
            }
            self.inner.put(key, value)
        }

        fn exists(&self, key: &StoreKey) -> Result<bool> {
            self.inner.exists(key)
        }
    }

    #[test]
    fn test_commit_restores_earlier_records_on_failure() {
        let alice = StoreKey::player(&PrincipalId::new("alice"));
        let bob = StoreKey::player(&PrincipalId::new("bob"));
        let store = RefusingStore {
            inner: MemoryStore::new(),
            refused: StoreKey::Game,
        };
        store.inner.put(alice.clone(), b"alice-old".to_vec()).unwrap();
        let siege = Siege::assemble(
            GameConfig::default(),
            Collaborators {
                store: Arc::new(store),
                clock: Arc::new(ManualClock::new(0)),
                bonus: Arc::new(FixedBonus(0)),
            },
        );

        let result = siege.commit(vec![
            StagedWrite {
                key: alice.clone(),
                bytes: b"alice-new".to_vec(),
                previous: Some(b"alice-old".to_vec()),
            },
            StagedWrite {
                key: bob.clone(),
                bytes: b"bob-new".to_vec(),
                previous: None,
            },
            StagedWrite {
                key: StoreKey::Game,
                bytes: b"game-new".to_vec(),
                previous: Some(b"game-old".to_vec()),
            },
        ]);

        assert!(matches!(result, Err(SiegeError::Store(_))));
        assert_eq!(siege.store.get(&alice).unwrap(), Some(b"alice-old".to_vec()));
        // New keys cannot be removed, only left as written
        assert_eq!(siege.store.get(&bob).unwrap(), Some(b"bob-new".to_vec()));
        assert!(!siege.store.exists(&StoreKey::Game).unwrap());
    }

    #[test]
    fn test_player_locks_shared_per_principal() {
        let locks = PlayerLocks::default();
        let a1 = locks.handle(&PrincipalId::new("alice"));
        let a2 = locks.handle(&PrincipalId::new("alice"));
        let b = locks.handle(&PrincipalId::new("bob"));
        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }
}
