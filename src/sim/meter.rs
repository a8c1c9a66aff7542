//! Utility kinds and per-kind consumption/generation meters.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

/// The closed set of metered utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum UtilityKind {
    Electric,
    Gas,
    Water,
}

impl UtilityKind {
    /// All utility kinds, in routing order.
    pub const ALL: [UtilityKind; 3] = [UtilityKind::Electric, UtilityKind::Gas, UtilityKind::Water];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilityKind::Electric => "Electric",
            UtilityKind::Gas => "Gas",
            UtilityKind::Water => "Water",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to a meter: owned by a house, referenced by appliances.
pub type SharedMeter = Rc<RefCell<Meter>>;

/// Invalid meter construction arguments.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("'{0}' meter cannot hold a generated value without generation support")]
    GeneratedWithoutSupport(UtilityKind),
}

/// Cumulative consumption/generation counters for one utility kind.
///
/// Counters never decrease. A meter without generation support keeps its
/// generated counter at zero for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Meter {
    kind: UtilityKind,
    consumed: u64,
    generated: u64,
    can_generate: bool,
}

impl Meter {
    /// Creates a meter with initial counter values.
    ///
    /// # Errors
    ///
    /// Returns [`MeterError::GeneratedWithoutSupport`] when `generated` is
    /// nonzero but `can_generate` is false.
    pub fn new(
        kind: UtilityKind,
        consumed: u64,
        can_generate: bool,
        generated: u64,
    ) -> Result<Self, MeterError> {
        if !can_generate && generated != 0 {
            return Err(MeterError::GeneratedWithoutSupport(kind));
        }
        Ok(Self {
            kind,
            consumed,
            generated,
            can_generate,
        })
    }

    /// Fresh consumption-only meter with zeroed counters.
    pub fn consumer(kind: UtilityKind) -> Self {
        Self {
            kind,
            consumed: 0,
            generated: 0,
            can_generate: false,
        }
    }

    /// Fresh meter with zeroed counters that also records generation.
    pub fn generator(kind: UtilityKind) -> Self {
        Self {
            kind,
            consumed: 0,
            generated: 0,
            can_generate: true,
        }
    }

    /// Wraps the meter in a shared handle.
    pub fn shared(self) -> SharedMeter {
        Rc::new(RefCell::new(self))
    }

    pub fn increment_consumed(&mut self) {
        self.increment_consumed_by(1);
    }

    pub fn increment_consumed_by(&mut self, amount: u64) {
        self.consumed += amount;
    }

    pub fn increment_generated(&mut self) {
        self.increment_generated_by(1);
    }

    /// Adds to the generated counter; a no-op on meters without generation
    /// support.
    pub fn increment_generated_by(&mut self, amount: u64) {
        if self.can_generate {
            self.generated += amount;
        }
    }

    pub fn kind(&self) -> UtilityKind {
        self.kind
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn can_generate(&self) -> bool {
        self.can_generate
    }
}
