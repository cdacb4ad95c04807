//! Top scorer tracking

use serde::{Deserialize, Serialize};

use crate::core::types::PrincipalId;

/// The single highest scorer seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leader: Option<PrincipalId>,
    pub points: u64,
}

impl Leaderboard {
    /// Offer a player's current score; they take the lead only by strictly
    /// beating the stored score. Returns whether the lead changed hands or grew.
    pub fn record(&mut self, player: &PrincipalId, points: u64) -> bool {
        if points > self.points {
            self.leader = Some(player.clone());
            self.points = points;
            return true;
        }
        false
    }
}
