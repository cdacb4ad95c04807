//! Player-issued actions: join, mobilize, defend, weather, attack
//!
//! Every action checks all of its preconditions and encodes every record
//! it will write before the first write, so a rejected call leaves the
//! store untouched. Multi-record writes go through `Siege::commit`, which
//! restores earlier records when a later write fails.

use crate::army::{self, Army};
use crate::combat::{evaluate, WeatherCondition, Winner};
use crate::core::error::{Result, SiegeError};
use crate::core::types::PrincipalId;
use crate::game::castle::CastleState;
use crate::game::events::{AttackOutcome, WeatherChanged};
use crate::game::player::PlayerState;
use crate::game::siege::{lock, Siege, StagedWrite};
use crate::store::records::{encode, read};
use crate::store::StoreKey;

impl Siege {
    /// Register a new player with the default army and starting turns
    ///
    /// The player record is written before the roster. If the roster write
    /// fails, the next call for the same principal finishes the join with
    /// the record already stored.
    pub fn join(&self, player: &PrincipalId, name: &str) -> Result<PlayerState> {
        let _game = lock(&self.game_lock);
        let handle = self.player_locks.handle(player);
        let _player = lock(&handle);

        let (mut game, game_previous) = self.load_game_with_bytes()?;
        let key = StoreKey::player(player);
        let stored: Option<PlayerState> = read(self.store.as_ref(), &key)?;
        let rostered = game.registered_players.contains(player);
        if stored.is_some() && rostered {
            return Err(SiegeError::AlreadyJoined(player.clone()));
        }

        if !rostered {
            game.registered_players.push(player.clone());
        }
        let game_write = StagedWrite {
            key: StoreKey::Game,
            bytes: encode(&game)?,
            previous: Some(game_previous),
        };

        let record = match stored {
            Some(record) => {
                self.commit(vec![game_write])?;
                tracing::warn!(player = %player, "Completed interrupted join");
                record
            }
            None => {
                let record =
                    PlayerState::new(name, self.config.default_army, self.config.initial_turns);
                let player_write = StagedWrite {
                    key,
                    bytes: encode(&record)?,
                    previous: None,
                };
                self.commit(vec![player_write, game_write])?;
                record
            }
        };

        tracing::info!(
            player = %player,
            name = %record.name,
            roster = game.registered_players.len(),
            "Player joined"
        );
        Ok(record)
    }

    /// Replace a player's army, spending one mobilization's worth of turns
    pub fn mobilize(&self, player: &PrincipalId, new_army: Army) -> Result<PlayerState> {
        self.ensure_joined(player)?;
        let handle = self.player_locks.handle(player);
        let _player = lock(&handle);

        let mut record = self.load_player(player)?;
        record.ensure_turns(self.config.mobilize_cost)?;
        army::validate(&new_army, self.config.attacker_cap)?;

        record.debit(self.config.mobilize_cost)?;
        record.army = new_army;
        self.store.put(StoreKey::player(player), encode(&record)?)?;

        tracing::debug!(
            player = %player,
            archers = new_army.archers,
            cavalry = new_army.cavalry,
            infantry = new_army.infantry,
            turns = record.turns,
            "Army mobilized"
        );
        Ok(record)
    }

    /// Station a new garrison; only the reigning king may
    pub fn defend(&self, player: &PrincipalId, new_army: Army) -> Result<CastleState> {
        let _game = lock(&self.game_lock);

        let mut game = self.load_game()?;
        if game.castle.king != *player {
            return Err(SiegeError::NotKing(player.clone()));
        }
        army::validate(&new_army, self.config.defense_cap)?;

        game.castle.defense = new_army;
        self.store.put(StoreKey::Game, encode(&game)?)?;

        tracing::debug!(
            king = %player,
            archers = new_army.archers,
            cavalry = new_army.cavalry,
            infantry = new_army.infantry,
            "Defense updated"
        );
        Ok(game.castle)
    }

    /// Change the castle weather
    ///
    /// Raw input is turned into a `WeatherCondition` by parsing, which is
    /// where out-of-range values are rejected.
    pub fn set_weather(
        &self,
        caller: &PrincipalId,
        weather: WeatherCondition,
    ) -> Result<WeatherChanged> {
        let _game = lock(&self.game_lock);
        let now = self.clock.now();

        if let Some(authority) = &self.config.weather_authority {
            if authority != caller {
                return Err(SiegeError::NotAuthorizedForWeather(caller.clone()));
            }
        }

        let mut game = self.load_game()?;
        if let Some(interval) = self.config.min_weather_interval_secs {
            let next_allowed = game.castle.last_weather_change_time.saturating_add(interval);
            if now < next_allowed {
                return Err(SiegeError::WeatherChangeTooSoon { now, next_allowed });
            }
        }

        let previous = game.castle.weather;
        game.castle.change_weather(weather, now);
        self.store.put(StoreKey::Game, encode(&game)?)?;

        tracing::info!(%previous, %weather, time = now, "Weather changed");
        Ok(WeatherChanged {
            previous,
            weather,
            timestamp: now,
        })
    }

    /// Attack the castle with the player's mobilized army
    ///
    /// Preconditions, in order: the attacker is not the king, has joined,
    /// and holds enough turns. The random bonus is drawn once, only after
    /// they all pass. Win or lose, the same records are rewritten.
    pub fn attack(&self, attacker: &PrincipalId) -> Result<AttackOutcome> {
        let _game = lock(&self.game_lock);
        let now = self.clock.now();

        let (mut game, game_previous) = self.load_game_with_bytes()?;
        if game.castle.king == *attacker {
            return Err(SiegeError::CannotAttackSelf(attacker.clone()));
        }
        self.ensure_joined(attacker)?;

        let handle = self.player_locks.handle(attacker);
        let _player = lock(&handle);

        let (mut record, player_previous) = self.load_player_with_bytes(attacker)?;
        record.ensure_turns(self.config.turns_needed_to_attack)?;

        let max_bonus = self.config.max_random_bonus;
        let random_bonus = self.bonus.draw(max_bonus).min(max_bonus);
        let previous_king = game.castle.king.clone();
        let weather = game.castle.weather;
        let attacker_army = record.army;

        let report = evaluate(&attacker_army, &game.castle.defense, weather, random_bonus);
        let won = report.winner == Winner::Attacker;

        record.debit(self.config.turns_needed_to_attack)?;
        record.points += u64::from(won);

        game.castle
            .apply_siege(report.winner, attacker, self.config.default_army, now);
        // No-op on a loss: points only grow by winning
        game.leaderboard.record(attacker, record.points);
        game.number_of_attacks += 1;

        // Read back after the update: on a win the attacker is now the defender
        let outcome = AttackOutcome {
            attacker: attacker.clone(),
            defender: game.castle.king.clone(),
            previous_king,
            attacker_army,
            defender_army: game.castle.defense,
            winner: game.castle.king.clone(),
            result: report.winner,
            weather,
            random_bonus,
            attacker_strength: report.attacker_strength,
            defender_strength: report.defender_strength,
            timestamp: now,
        };

        self.commit(vec![
            StagedWrite {
                key: StoreKey::player(attacker),
                bytes: encode(&record)?,
                previous: Some(player_previous),
            },
            StagedWrite {
                key: StoreKey::Game,
                bytes: encode(&game)?,
                previous: Some(game_previous),
            },
        ])?;

        tracing::info!(
            attacker = %attacker,
            king = %outcome.defender,
            result = ?outcome.result,
            %weather,
            random_bonus,
            attacker_strength = report.attacker_strength,
            defender_strength = report.defender_strength,
            "Castle attacked"
        );
        Ok(outcome)
    }
}
