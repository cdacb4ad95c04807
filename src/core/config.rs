//! Game configuration with documented rule values
//!
//! Every rule number the engine consults lives here. Defaults come from
//! `game::constants`; a TOML file may override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::core::error::{Result, SiegeError};
use crate::core::types::PrincipalId;
use crate::game::constants::{
    ATTACKER_CAP, DEFENSE_CAP, INITIAL_TURNS, MAX_RANDOM_BONUS, MOBILIZE_COST,
    TICK_INTERVAL_SECS, TURNS_NEEDED_TO_ATTACK,
};

/// Rules for one siege game
///
/// Changing these affects pacing: the tick interval and turn costs decide
/// how often a player can strike, the caps decide how lopsided a fight gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === ARMIES ===
    /// Largest army a player may mobilize (sum of unit counts)
    pub attacker_cap: u64,

    /// Largest army the king may station in the castle
    ///
    /// Kept below `attacker_cap` so a fully mobilized challenger always
    /// has a numbers edge over a fully stocked castle.
    pub defense_cap: u64,

    /// Army given to new players and installed in the castle on succession
    pub default_army: Army,

    // === TURN ECONOMY ===
    /// Turns a player starts with on joining
    pub initial_turns: u64,

    /// Turns consumed by one mobilization
    pub mobilize_cost: u64,

    /// Turns consumed by one attack, win or lose
    pub turns_needed_to_attack: u64,

    /// Minimum seconds between two ticks
    pub tick_interval_secs: u64,

    /// Ceiling on a player's turn balance during tick replenishment
    ///
    /// `None` leaves balances uncapped.
    pub max_turns: Option<u64>,

    // === COMBAT ===
    /// Inclusive upper bound of the attacker's random bonus, in percent
    ///
    /// At 105 the attacker fights at up to 5% above nominal strength.
    pub max_random_bonus: u64,

    // === WEATHER ===
    /// The only principal allowed to change the weather
    ///
    /// `None` leaves authorization to the surrounding service.
    pub weather_authority: Option<PrincipalId>,

    /// Minimum seconds between two weather changes, if any
    pub min_weather_interval_secs: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            attacker_cap: ATTACKER_CAP,
            defense_cap: DEFENSE_CAP,
            default_army: Army::default(),

            initial_turns: INITIAL_TURNS,
            mobilize_cost: MOBILIZE_COST,
            turns_needed_to_attack: TURNS_NEEDED_TO_ATTACK,
            tick_interval_secs: TICK_INTERVAL_SECS,
            max_turns: None,

            max_random_bonus: MAX_RANDOM_BONUS,

            weather_authority: None,
            min_weather_interval_secs: None,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; absent fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.defense_cap > self.attacker_cap {
            return Err(SiegeError::InvalidConfig(format!(
                "defense_cap ({}) should be <= attacker_cap ({})",
                self.defense_cap, self.attacker_cap
            )));
        }

        let default_size = self.default_army.base_strength();
        if default_size > self.defense_cap {
            return Err(SiegeError::InvalidConfig(format!(
                "default_army ({} units) exceeds defense_cap ({})",
                default_size, self.defense_cap
            )));
        }

        if self.tick_interval_secs == 0 {
            return Err(SiegeError::InvalidConfig(
                "tick_interval_secs must be positive".into(),
            ));
        }

        if let Some(max) = self.max_turns {
            if max < self.initial_turns {
                return Err(SiegeError::InvalidConfig(format!(
                    "max_turns ({}) should be >= initial_turns ({})",
                    max, self.initial_turns
                )));
            }
        }

        Ok(())
    }
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<GameConfig> {
    let content = fs::read_to_string(path)?;
    GameConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            tick_interval_secs = 60
            max_turns = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_interval_secs, 60);
        assert_eq!(config.max_turns, Some(20));
        assert_eq!(config.attacker_cap, ATTACKER_CAP);
        assert_eq!(config.default_army, Army::new(500, 500, 500));
    }

    #[test]
    fn test_toml_default_army_and_authority() {
        let config = GameConfig::from_toml_str(
            r#"
            weather_authority = "oracle"

            [default_army]
            archers = 100
            cavalry = 200
            infantry = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.default_army, Army::new(100, 200, 300));
        assert_eq!(config.weather_authority, Some(PrincipalId::new("oracle")));
    }

    #[test]
    fn test_inverted_caps_rejected() {
        let config = GameConfig {
            defense_cap: 2500,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(SiegeError::InvalidConfig(_))));
    }

    #[test]
    fn test_max_turns_below_initial_rejected() {
        let config = GameConfig {
            max_turns: Some(5),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let result = GameConfig::from_toml_str("tick_interval_secs = 0");
        assert!(matches!(result, Err(SiegeError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = GameConfig::from_toml_str("attacker_cap = \"lots\"");
        assert!(matches!(result, Err(SiegeError::ConfigParse(_))));
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/siege.toml");
        let config = load_config(&path).expect("Should load shipped config");
        assert_eq!(config.attacker_cap, ATTACKER_CAP);
    }
}
