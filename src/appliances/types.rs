//! Common types for appliance simulation components.

use crate::sim::meter::UtilityKind;

/// How long an appliance stays on once started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCycle {
    /// Never shuts off automatically; stays on until explicitly stopped.
    AlwaysOn,
    /// Shuts off automatically after this many consecutive ticks on.
    Fixed(u32),
}

impl DutyCycle {
    pub fn is_always_on(&self) -> bool {
        matches!(self, DutyCycle::AlwaysOn)
    }
}

/// Signed per-tick usage rates, one per utility kind.
///
/// Positive rates consume from the matching meter, negative rates generate
/// into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageRates {
    pub electric: i64,
    pub gas: i64,
    pub water: i64,
}

impl UsageRates {
    pub const fn new(electric: i64, gas: i64, water: i64) -> Self {
        Self {
            electric,
            gas,
            water,
        }
    }

    pub fn get(&self, kind: UtilityKind) -> i64 {
        match kind {
            UtilityKind::Electric => self.electric,
            UtilityKind::Gas => self.gas,
            UtilityKind::Water => self.water,
        }
    }

    pub fn set(&mut self, kind: UtilityKind, rate: i64) {
        match kind {
            UtilityKind::Electric => self.electric = rate,
            UtilityKind::Gas => self.gas = rate,
            UtilityKind::Water => self.water = rate,
        }
    }

    /// All rates paired with their utility kind, in routing order.
    pub fn entries(&self) -> [(UtilityKind, i64); 3] {
        [
            (UtilityKind::Electric, self.electric),
            (UtilityKind::Gas, self.gas),
            (UtilityKind::Water, self.water),
        ]
    }
}
