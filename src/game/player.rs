//! Per-player state and turn ledger
//!
//! Turns are the action currency: mobilizing and attacking spend them,
//! ticks hand them back out.

use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::core::error::{Result, SiegeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub army: Army,
    pub turns: u64,
    /// Attacks won
    pub points: u64,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, army: Army, turns: u64) -> Self {
        Self {
            name: name.into(),
            army,
            turns,
            points: 0,
        }
    }

    /// Fail unless at least `required` turns are available
    pub fn ensure_turns(&self, required: u64) -> Result<()> {
        if self.turns < required {
            return Err(SiegeError::NotEnoughTurns {
                available: self.turns,
                required,
            });
        }
        Ok(())
    }

    /// Spend `cost` turns, leaving the balance untouched on failure
    pub fn debit(&mut self, cost: u64) -> Result<()> {
        self.ensure_turns(cost)?;
        self.turns -= cost;
        Ok(())
    }

    /// Grant one turn, never exceeding `max_turns` when a ceiling is set
    ///
    /// A balance already above the ceiling is left alone rather than cut.
    /// Returns whether the balance changed.
    pub fn credit(&mut self, max_turns: Option<u64>) -> bool {
        let next = self.turns.saturating_add(1);
        let next = match max_turns {
            Some(max) => next.min(max).max(self.turns),
            None => next,
        };
        let changed = next != self.turns;
        self.turns = next;
        changed
    }
}
