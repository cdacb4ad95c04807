//! Castle weather and its per-unit-type combat modifiers
//!
//! Weather favors some unit types and hampers others. Both armies in an
//! attack fight under the same reading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::army::UnitType;
use crate::core::error::SiegeError;

/// Current weather over the castle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Snow,
    Rain,
    Drizzle,
    Thunderstorm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 6] = [
        Self::Clear,
        Self::Clouds,
        Self::Snow,
        Self::Rain,
        Self::Drizzle,
        Self::Thunderstorm,
    ];

    /// Archer effectiveness, percent (100 = neutral)
    pub fn archer_modifier(&self) -> u64 {
        match self {
            Self::Clear => 125,
            Self::Clouds => 115,
            Self::Snow => 100,
            Self::Drizzle => 85,
            Self::Rain => 85,
            Self::Thunderstorm => 75,
        }
    }

    /// Cavalry effectiveness, percent (100 = neutral)
    pub fn cavalry_modifier(&self) -> u64 {
        match self {
            Self::Clear => 115,
            Self::Clouds => 125,
            Self::Snow => 85,
            Self::Drizzle => 85,
            Self::Rain => 75,
            Self::Thunderstorm => 50,
        }
    }

    /// Infantry effectiveness, percent (100 = neutral)
    pub fn infantry_modifier(&self) -> u64 {
        match self {
            Self::Clear => 100,
            Self::Clouds => 100,
            Self::Snow => 115,
            Self::Drizzle => 115,
            Self::Rain => 125,
            Self::Thunderstorm => 125,
        }
    }

    pub fn modifier(&self, unit: UnitType) -> u64 {
        match unit {
            UnitType::Archer => self.archer_modifier(),
            UnitType::Cavalry => self.cavalry_modifier(),
            UnitType::Infantry => self.infantry_modifier(),
        }
    }

    /// Numeric code used by external callers (0 = Clear .. 5 = Thunderstorm)
    pub fn code(&self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Clouds => 1,
            Self::Snow => 2,
            Self::Rain => 3,
            Self::Drizzle => 4,
            Self::Thunderstorm => 5,
        }
    }

    /// Parse a numeric code; anything outside 0..=5 is `InvalidWeather`
    pub fn from_code(code: u8) -> Result<Self, SiegeError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| SiegeError::InvalidWeather(code.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Snow => "snow",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Thunderstorm => "thunderstorm",
        }
    }
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self::Clear
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeatherCondition {
    type Err = SiegeError;

    /// Accepts a name (any case) or a numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SiegeError::InvalidWeather(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        let expected = [
            (WeatherCondition::Clear, 125, 115, 100),
            (WeatherCondition::Clouds, 115, 125, 100),
            (WeatherCondition::Snow, 100, 85, 115),
            (WeatherCondition::Drizzle, 85, 85, 115),
            (WeatherCondition::Rain, 85, 75, 125),
            (WeatherCondition::Thunderstorm, 75, 50, 125),
        ];
        for (weather, archer, cavalry, infantry) in expected {
            assert_eq!(weather.archer_modifier(), archer, "{weather} archers");
            assert_eq!(weather.cavalry_modifier(), cavalry, "{weather} cavalry");
            assert_eq!(weather.infantry_modifier(), infantry, "{weather} infantry");
        }
    }

    #[test]
    fn test_modifier_by_unit_type() {
        let w = WeatherCondition::Rain;
        assert_eq!(w.modifier(UnitType::Archer), w.archer_modifier());
        assert_eq!(w.modifier(UnitType::Cavalry), w.cavalry_modifier());
        assert_eq!(w.modifier(UnitType::Infantry), w.infantry_modifier());
    }

    #[test]
    fn test_no_neutral_fallback() {
        // Every condition has its own entry; none silently reads as all-neutral
        for weather in WeatherCondition::ALL {
            let mods = [
                weather.archer_modifier(),
                weather.cavalry_modifier(),
                weather.infantry_modifier(),
            ];
            assert_ne!(mods, [100, 100, 100], "{weather}");
        }
    }

    #[test]
    fn test_code_round_trip() {
        for weather in WeatherCondition::ALL {
            assert_eq!(WeatherCondition::from_code(weather.code()).unwrap(), weather);
        }
    }

    #[test]
    fn test_out_of_range_code_rejected() {
        assert!(matches!(
            WeatherCondition::from_code(6),
            Err(SiegeError::InvalidWeather(_))
        ));
        assert!(WeatherCondition::from_code(u8::MAX).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Thunderstorm".parse::<WeatherCondition>().unwrap(), WeatherCondition::Thunderstorm);
        assert_eq!(" snow ".parse::<WeatherCondition>().unwrap(), WeatherCondition::Snow);
        assert_eq!("3".parse::<WeatherCondition>().unwrap(), WeatherCondition::Rain);
        assert!(matches!(
            "hail".parse::<WeatherCondition>(),
            Err(SiegeError::InvalidWeather(_))
        ));
    }

    #[test]
    fn test_default_is_clear() {
        assert_eq!(WeatherCondition::default(), WeatherCondition::Clear);
    }
}
