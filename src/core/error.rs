use thiserror::Error;

use crate::core::types::{PrincipalId, Timestamp};

#[derive(Error, Debug)]
pub enum SiegeError {
    #[error("Army of {size} units exceeds the cap of {cap}")]
    InvalidArmySize { size: u64, cap: u64 },

    #[error("Not enough turns: have {available}, need {required}")]
    NotEnoughTurns { available: u64, required: u64 },

    #[error("{0} is not the king")]
    NotKing(PrincipalId),

    #[error("{0} may not change the weather")]
    NotAuthorizedForWeather(PrincipalId),

    #[error("Invalid weather: {0}")]
    InvalidWeather(String),

    #[error("{0} already holds the castle")]
    CannotAttackSelf(PrincipalId),

    #[error("Tick too soon: next tick allowed at {next_allowed}, now {now}")]
    TickTooSoon { now: Timestamp, next_allowed: Timestamp },

    #[error("{0} has already joined")]
    AlreadyJoined(PrincipalId),

    #[error("{0} has not joined")]
    NotJoined(PrincipalId),

    #[error("Weather change too soon: next change allowed at {next_allowed}, now {now}")]
    WeatherChangeTooSoon { now: Timestamp, next_allowed: Timestamp },

    #[error("Game state already initialized")]
    AlreadyInitialized,

    #[error("Game state not initialized")]
    NotInitialized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SiegeError>;
