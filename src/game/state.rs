//! Game-wide state record

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::core::types::{GameTurn, PrincipalId, Timestamp};
use crate::game::castle::CastleState;
use crate::game::leaderboard::Leaderboard;

/// Everything shared by all players
///
/// Player records live under their own keys; the roster only names them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub castle: CastleState,
    pub number_of_attacks: u64,
    pub game_turn: GameTurn,
    pub last_tick_time: Timestamp,
    /// Join order; ticks credit players in this order
    pub registered_players: Vec<PrincipalId>,
    pub leaderboard: Leaderboard,
}

impl GameState {
    pub fn genesis(king: PrincipalId, default_army: Army, now: Timestamp) -> Self {
        Self {
            castle: CastleState::genesis(king, default_army, now),
            number_of_attacks: 0,
            game_turn: 0,
            last_tick_time: now,
            registered_players: Vec::new(),
            leaderboard: Leaderboard::default(),
        }
    }
}
