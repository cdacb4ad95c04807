pub mod bonus;
pub mod resolution;
pub mod weather;

pub use bonus::{BonusSource, FixedBonus, RngBonus};
pub use resolution::{apply_bonus, effective_strength, evaluate, resolve, CombatReport, Winner};
pub use weather::WeatherCondition;
