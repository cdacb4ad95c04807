//! The contested castle: who holds it, what guards it, and the sky above it

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::combat::{WeatherCondition, Winner};
use crate::core::types::{PrincipalId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastleState {
    pub king: PrincipalId,
    pub defense: Army,
    pub weather: WeatherCondition,
    pub last_weather_change_time: Timestamp,
    pub last_king_change_time: Timestamp,
}

impl CastleState {
    /// Castle as it stands before anyone has attacked
    pub fn genesis(king: PrincipalId, defense: Army, now: Timestamp) -> Self {
        Self {
            king,
            defense,
            weather: WeatherCondition::Clear,
            last_weather_change_time: now,
            last_king_change_time: now,
        }
    }

    /// Apply the result of an attack
    ///
    /// A winning attacker takes the crown and the garrison resets to
    /// `default_army`. Both outcomes rewrite the same three fields.
    pub fn apply_siege(
        &mut self,
        winner: Winner,
        attacker: &PrincipalId,
        default_army: Army,
        now: Timestamp,
    ) {
        let taken = winner == Winner::Attacker;

        let king = if taken { attacker } else { &self.king }.clone();
        let defense = if taken { default_army } else { self.defense };
        let changed_at = if taken { now } else { self.last_king_change_time };

        self.king = king;
        self.defense = defense;
        self.last_king_change_time = changed_at;
    }

    pub fn change_weather(&mut self, weather: WeatherCondition, now: Timestamp) {
        self.weather = weather;
        self.last_weather_change_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castle() -> CastleState {
        let mut castle = CastleState::genesis(PrincipalId::new("alice"), Army::default(), 10);
        castle.defense = Army::new(10, 10, 10);
        castle
    }

    #[test]
    fn test_genesis_defaults() {
        let castle = CastleState::genesis(PrincipalId::new("founder"), Army::default(), 42);
        assert_eq!(castle.weather, WeatherCondition::Clear);
        assert_eq!(castle.defense, Army::new(500, 500, 500));
        assert_eq!(castle.last_king_change_time, 42);
        assert_eq!(castle.last_weather_change_time, 42);
    }

    #[test]
    fn test_attacker_victory_crowns_and_resets() {
        let mut castle = castle();
        castle.apply_siege(Winner::Attacker, &PrincipalId::new("bob"), Army::default(), 99);
        assert_eq!(castle.king, PrincipalId::new("bob"));
        assert_eq!(castle.defense, Army::default());
        assert_eq!(castle.last_king_change_time, 99);
    }

    #[test]
    fn test_defender_victory_changes_nothing() {
        let mut castle = castle();
        let before = castle.clone();
        castle.apply_siege(Winner::Defender, &PrincipalId::new("bob"), Army::default(), 99);
        assert_eq!(castle, before);
    }

    #[test]
    fn test_change_weather_stamps_time() {
        let mut castle = castle();
        castle.change_weather(WeatherCondition::Rain, 500);
        assert_eq!(castle.weather, WeatherCondition::Rain);
        assert_eq!(castle.last_weather_change_time, 500);
        assert_eq!(castle.last_king_change_time, 10);
    }
}
