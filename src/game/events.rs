//! Outcome records handed to whatever relays game events

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::combat::{WeatherCondition, Winner};
use crate::core::types::{GameTurn, PrincipalId, Timestamp};

/// Result of one attack on the castle
///
/// `defender`, `winner` and `defender_army` are read from the castle after
/// the outcome has been applied: on a win `defender` is the attacker
/// itself and `defender_army` is the fresh default garrison.
/// `previous_king` names who actually held the castle during the fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: PrincipalId,
    pub defender: PrincipalId,
    pub previous_king: PrincipalId,
    pub attacker_army: Army,
    pub defender_army: Army,
    pub winner: PrincipalId,
    pub result: Winner,
    pub weather: WeatherCondition,
    pub random_bonus: u64,
    pub attacker_strength: u64,
    pub defender_strength: u64,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickAdvanced {
    pub game_turn: GameTurn,
    pub timestamp: Timestamp,
    /// Players whose balance actually grew (all of them unless capped)
    pub players_credited: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherChanged {
    pub previous: WeatherCondition,
    pub weather: WeatherCondition,
    pub timestamp: Timestamp,
}

/// Any record the engine emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Attack(AttackOutcome),
    TickAdvanced(TickAdvanced),
    WeatherChanged(WeatherChanged),
}

impl From<AttackOutcome> for GameEvent {
    fn from(outcome: AttackOutcome) -> Self {
        Self::Attack(outcome)
    }
}

impl From<TickAdvanced> for GameEvent {
    fn from(tick: TickAdvanced) -> Self {
        Self::TickAdvanced(tick)
    }
}

impl From<WeatherChanged> for GameEvent {
    fn from(change: WeatherChanged) -> Self {
        Self::WeatherChanged(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event: GameEvent = TickAdvanced {
            game_turn: 3,
            timestamp: 7200,
            players_credited: 2,
        }
        .into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "tick_advanced");
        assert_eq!(json["game_turn"], 3);
    }
}
