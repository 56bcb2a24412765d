//! Seeded randomness backing the simulation's probabilistic outcomes.

use gym_floor_core::{Chance, Odds, Roll};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic [`Chance`] driven by a seeded ChaCha stream.
#[derive(Clone, Debug)]
pub struct SeededChance {
    rng: ChaCha8Rng,
    odds: Odds,
}

impl SeededChance {
    /// Creates a source that replays identically for the same seed and odds.
    #[must_use]
    pub fn new(seed: u64, odds: Odds) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            odds,
        }
    }

    /// Probabilities this source rolls against.
    #[must_use]
    pub const fn odds(&self) -> &Odds {
        &self.odds
    }
}

impl Chance for SeededChance {
    fn roll(&mut self, roll: Roll) -> bool {
        let probability = self.odds.probability(roll);
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen::<f32>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn between(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certain_odds_skip_the_generator() {
        let odds = Odds {
            bench_dirty: 1.0,
            treadmill_dirty: 0.0,
            ..Odds::default()
        };
        let mut chance = SeededChance::new(7, odds);
        for _ in 0..32 {
            assert!(chance.roll(Roll::BenchTurnsDirty));
            assert!(!chance.roll(Roll::TreadmillTurnsDirty));
        }
    }

    #[test]
    fn same_seed_replays_the_same_stream() {
        let mut first = SeededChance::new(42, Odds::default());
        let mut second = SeededChance::new(42, Odds::default());
        for _ in 0..64 {
            assert_eq!(
                first.roll(Roll::DumbbellsDropped),
                second.roll(Roll::DumbbellsDropped)
            );
            assert_eq!(first.pick(5), second.pick(5));
            assert_eq!(first.between(1, 4), second.between(1, 4));
        }
    }

    #[test]
    fn ranges_stay_within_bounds() {
        let mut chance = SeededChance::new(3, Odds::default());
        for _ in 0..128 {
            assert!(chance.pick(3) < 3);
            assert!((1..=2).contains(&chance.between(1, 2)));
        }
        assert_eq!(chance.between(4, 2), 4);
        assert_eq!(chance.pick(0), 0);
    }
}
