//! Random bonus source for attacks
//!
//! Resolution itself stays pure; the bonus is drawn here, once per attack,
//! and handed in as a plain number.

use std::sync::Mutex;

use rand::Rng;

/// Uniform draw from `[0, max]`, inclusive
pub trait BonusSource: Send + Sync {
    fn draw(&self, max: u64) -> u64;
}

/// Bonus drawn from any `rand` generator
#[derive(Debug)]
pub struct RngBonus<R> {
    rng: Mutex<R>,
}

impl<R: Rng + Send> RngBonus<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: Rng + Send> BonusSource for RngBonus<R> {
    fn draw(&self, max: u64) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..=max)
    }
}

/// Always the same bonus, clamped to the allowed range
#[derive(Debug, Clone, Copy)]
pub struct FixedBonus(pub u64);

impl BonusSource for FixedBonus {
    fn draw(&self, max: u64) -> u64 {
        self.0.min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::MAX_RANDOM_BONUS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rng_bonus_in_range() {
        let source = RngBonus::new(ChaCha8Rng::seed_from_u64(42));
        for _ in 0..1000 {
            assert!(source.draw(MAX_RANDOM_BONUS) <= MAX_RANDOM_BONUS);
        }
    }

    #[test]
    fn test_rng_bonus_deterministic_with_seed() {
        let a = RngBonus::new(ChaCha8Rng::seed_from_u64(7));
        let b = RngBonus::new(ChaCha8Rng::seed_from_u64(7));
        let draws_a: Vec<u64> = (0..20).map(|_| a.draw(MAX_RANDOM_BONUS)).collect();
        let draws_b: Vec<u64> = (0..20).map(|_| b.draw(MAX_RANDOM_BONUS)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_rng_bonus_reaches_both_ends() {
        let source = RngBonus::new(ChaCha8Rng::seed_from_u64(1));
        let draws: Vec<u64> = (0..5000).map(|_| source.draw(MAX_RANDOM_BONUS)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&MAX_RANDOM_BONUS));
    }

    #[test]
    fn test_fixed_bonus_clamped() {
        assert_eq!(FixedBonus(50).draw(MAX_RANDOM_BONUS), 50);
        assert_eq!(FixedBonus(500).draw(MAX_RANDOM_BONUS), MAX_RANDOM_BONUS);
    }
}
