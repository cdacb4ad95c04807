//! Siege combat resolution
//!
//! Pure integer arithmetic: the same armies, weather and bonus always give
//! the same result. Each unit-type term truncates on its own before the
//! terms are summed.

use serde::{Deserialize, Serialize};

use crate::army::{Army, UnitType};
use crate::combat::weather::WeatherCondition;
use crate::game::constants::PERCENT;

/// Side that carried the fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Attacker,
    Defender,
}

/// Strengths that decided a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub winner: Winner,
    /// Attacker strength after weather and random bonus
    pub attacker_strength: u64,
    /// Defender strength after weather
    pub defender_strength: u64,
}

fn unit_term(count: u64, modifier: u64) -> u64 {
    count.saturating_mul(modifier) / PERCENT
}

/// Army strength under the given weather
pub fn effective_strength(army: &Army, weather: WeatherCondition) -> u64 {
    unit_term(army.archers, weather.modifier(UnitType::Archer))
        .saturating_add(unit_term(army.cavalry, weather.modifier(UnitType::Cavalry)))
        .saturating_add(unit_term(army.infantry, weather.modifier(UnitType::Infantry)))
}

/// Scale a strength by a percentage bonus (100 = unchanged, 0 = nothing left)
pub fn apply_bonus(strength: u64, random_bonus: u64) -> u64 {
    strength.saturating_mul(random_bonus) / PERCENT
}

/// Compute both strengths and pick the winner
///
/// Both sides go through the same computation regardless of outcome, and
/// the winner is a single comparison. A tie goes to the defender.
pub fn evaluate(
    attacker: &Army,
    defender: &Army,
    weather: WeatherCondition,
    random_bonus: u64,
) -> CombatReport {
    let attacker_strength = apply_bonus(effective_strength(attacker, weather), random_bonus);
    let defender_strength = effective_strength(defender, weather);

    let winner = if attacker_strength > defender_strength {
        Winner::Attacker
    } else {
        Winner::Defender
    };

    CombatReport {
        winner,
        attacker_strength,
        defender_strength,
    }
}

/// Decide who wins an attack on the castle
pub fn resolve(
    attacker: &Army,
    defender: &Army,
    weather: WeatherCondition,
    random_bonus: u64,
) -> Winner {
    evaluate(attacker, defender, weather, random_bonus).winner
}
