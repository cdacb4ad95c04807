//! Armies and their size caps
//!
//! An army is a plain triple of unit counts. Its base strength is the
//! total head count; weather only matters once combat resolves it.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SiegeError};
use crate::game::constants::DEFAULT_UNITS_PER_TYPE;

/// The three unit types an army is composed of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Archer,
    Cavalry,
    Infantry,
}

/// Unit counts for one army
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Army {
    pub archers: u64,
    pub cavalry: u64,
    pub infantry: u64,
}

impl Army {
    pub fn new(archers: u64, cavalry: u64, infantry: u64) -> Self {
        Self {
            archers,
            cavalry,
            infantry,
        }
    }

    /// Total unit count, before any weather modifier
    pub fn base_strength(&self) -> u64 {
        self.archers
            .saturating_add(self.cavalry)
            .saturating_add(self.infantry)
    }

    pub fn count(&self, unit: UnitType) -> u64 {
        match unit {
            UnitType::Archer => self.archers,
            UnitType::Cavalry => self.cavalry,
            UnitType::Infantry => self.infantry,
        }
    }

    /// Check this army against a size cap
    pub fn validate(&self, cap: u64) -> Result<()> {
        validate(self, cap)
    }
}

impl Default for Army {
    /// 500 of each unit type
    fn default() -> Self {
        Self::new(
            DEFAULT_UNITS_PER_TYPE,
            DEFAULT_UNITS_PER_TYPE,
            DEFAULT_UNITS_PER_TYPE,
        )
    }
}

/// Reject armies whose base strength exceeds `cap`
///
/// The cap is inclusive: an army of exactly `cap` units passes.
pub fn validate(army: &Army, cap: u64) -> Result<()> {
    let size = army.base_strength();
    if size > cap {
        return Err(SiegeError::InvalidArmySize { size, cap });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{ATTACKER_CAP, DEFENSE_CAP};

    #[test]
    fn test_base_strength_is_sum() {
        assert_eq!(Army::new(1, 2, 3).base_strength(), 6);
        assert_eq!(Army::default().base_strength(), 1500);
    }

    #[test]
    fn test_base_strength_saturates() {
        assert_eq!(Army::new(u64::MAX, 1, 1).base_strength(), u64::MAX);
    }

    #[test]
    fn test_attacker_cap_boundary() {
        assert!(validate(&Army::new(1000, 500, 500), ATTACKER_CAP).is_ok());
        let err = validate(&Army::new(1000, 500, 501), ATTACKER_CAP).unwrap_err();
        assert!(matches!(
            err,
            SiegeError::InvalidArmySize { size: 2001, cap: 2000 }
        ));
    }

    #[test]
    fn test_defense_cap_boundary() {
        assert!(Army::new(600, 500, 500).validate(DEFENSE_CAP).is_ok());
        assert!(Army::new(601, 500, 500).validate(DEFENSE_CAP).is_err());
    }

    #[test]
    fn test_empty_army_is_valid() {
        assert!(Army::new(0, 0, 0).validate(DEFENSE_CAP).is_ok());
    }

    #[test]
    fn test_count_by_unit_type() {
        let army = Army::new(7, 8, 9);
        assert_eq!(army.count(UnitType::Archer), 7);
        assert_eq!(army.count(UnitType::Cavalry), 8);
        assert_eq!(army.count(UnitType::Infantry), 9);
    }
}
