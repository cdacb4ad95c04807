//! Game rule constants - default values for every tunable in `GameConfig`

// Army size caps (sum of all three unit types)
pub const ATTACKER_CAP: u64 = 2000;
pub const DEFENSE_CAP: u64 = 1600;

// Default army, used for new players and for the castle after a succession
pub const DEFAULT_UNITS_PER_TYPE: u64 = 500;

// Turn economy
pub const INITIAL_TURNS: u64 = 10;
pub const MOBILIZE_COST: u64 = 1;
pub const TURNS_NEEDED_TO_ATTACK: u64 = 3;
pub const TICK_INTERVAL_SECS: u64 = 3600;

// Random bonus applied to attacker strength, percent, inclusive upper bound
pub const MAX_RANDOM_BONUS: u64 = 105;

// Percentage base for weather modifiers and the random bonus
pub const PERCENT: u64 = 100;
