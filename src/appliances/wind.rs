//! Fluctuating generation for turbine appliances.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Per-tick adjustment of a generating usage rate.
///
/// Implementations receive the configured nominal rate and return the rate
/// actually routed to meters this tick. Consuming (non-negative) rates pass
/// through unchanged.
pub trait GenerationModel {
    fn rate(&mut self, nominal: i64) -> i64;
}

/// Gusty wind profile: generation swings uniformly between calm and twice
/// the nominal rate. Deterministic per seed.
#[derive(Debug)]
pub struct GustyWind {
    rng: StdRng,
}

impl GustyWind {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GenerationModel for GustyWind {
    fn rate(&mut self, nominal: i64) -> i64 {
        if nominal >= 0 {
            return nominal;
        }
        let span = nominal.unsigned_abs() * 2;
        -(self.rng.random_range(0..=span) as i64)
    }
}
