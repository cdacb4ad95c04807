//! Castle Siege - Persistent Many-Player Siege Game
//!
//! Players spend turns to mobilize armies and attack a shared castle.
//! Combat depends on army composition, the castle weather and a bounded
//! random bonus; winners take the crown and climb the leaderboard.

pub mod army;
pub mod combat;
pub mod core;
pub mod game;
pub mod store;

pub use crate::army::Army;
pub use crate::combat::{WeatherCondition, Winner};
pub use crate::core::config::GameConfig;
pub use crate::core::error::{Result, SiegeError};
pub use crate::core::types::PrincipalId;
pub use crate::game::{Collaborators, Siege};
