//! Rate-limited global tick: advances the game turn and hands every
//! registered player one more turn

use crate::core::error::{Result, SiegeError};
use crate::game::events::TickAdvanced;
use crate::core::types::PrincipalId;
use crate::game::siege::{lock, Siege};
use crate::store::records::encode;
use crate::store::StoreKey;

impl Siege {
    /// Advance the game by one turn
    ///
    /// Holds the game lock for the whole sweep. Each player lock is taken
    /// and released in roster order, one at a time. The advanced counters
    /// are written only after every player has been credited. If any step
    /// fails, the credits already written are taken back before the error
    /// is returned, so a retry never pays a player twice.
    pub fn tick(&self) -> Result<TickAdvanced> {
        let _game = lock(&self.game_lock);
        let now = self.clock.now();

        let mut game = self.load_game()?;
        let next_allowed = game.last_tick_time.saturating_add(self.config.tick_interval_secs);
        if now < next_allowed {
            return Err(SiegeError::TickTooSoon { now, next_allowed });
        }

        game.last_tick_time = now;
        game.game_turn += 1;
        let game_bytes = encode(&game)?;

        let mut credited = Vec::with_capacity(game.registered_players.len());
        let swept: Result<()> = game
            .registered_players
            .iter()
            .try_for_each(|player| {
                let amount = self.credit_player(player)?;
                credited.push((player, amount));
                Ok::<(), SiegeError>(())
            })
            .and_then(|()| self.store.put(StoreKey::Game, game_bytes));
        if let Err(err) = swept {
            self.revoke_credits(&credited);
            return Err(err);
        }

        let players_credited = credited.iter().filter(|(_, amount)| *amount > 0).count();
        tracing::info!(
            game_turn = game.game_turn,
            time = now,
            players = game.registered_players.len(),
            players_credited,
            "Tick advanced"
        );
        Ok(TickAdvanced {
            game_turn: game.game_turn,
            timestamp: now,
            players_credited,
        })
    }

    /// Grant one player their tick turn, returning how many turns were added
    fn credit_player(&self, player: &PrincipalId) -> Result<u64> {
        let handle = self.player_locks.handle(player);
        let _player = lock(&handle);

        let mut record = self.load_player(player)?;
        let before = record.turns;
        record.credit(self.config.max_turns);
        self.store.put(StoreKey::player(player), encode(&record)?)?;
        Ok(record.turns - before)
    }

    /// Take back turns granted by a sweep that did not complete
    ///
    /// Subtracts rather than restoring old bytes, since each player lock was
    /// released after crediting and a mobilize may have landed since.
    fn revoke_credits(&self, credited: &[(&PrincipalId, u64)]) {
        for &(player, amount) in credited.iter().rev() {
            if amount == 0 {
                continue;
            }
            let handle = self.player_locks.handle(player);
            let _player = lock(&handle);

            let revoked = self.load_player(player).and_then(|mut record| {
                record.turns = record.turns.saturating_sub(amount);
                self.store.put(StoreKey::player(player), encode(&record)?)
            });
            if let Err(err) = revoked {
                tracing::error!(player = %player, error = %err, "Failed to revoke tick credit");
            }
        }
        tracing::warn!(players = credited.len(), "Tick sweep rolled back");
    }
}
