//! Periodic meter reports and the end-of-run usage summary.

use std::fmt;

use crate::sim::house::House;
use crate::sim::meter::UtilityKind;

/// One meter's cumulative totals at a report boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterReading {
    pub house: String,
    pub tick: u64,
    pub kind: UtilityKind,
    pub consumed: u64,
    pub generated: u64,
}

impl fmt::Display for MeterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meter: consumed={} generated={}",
            self.kind, self.consumed, self.generated
        )
    }
}

/// Final cumulative totals across every house, computed once a run ends.
#[derive(Debug, Clone)]
pub struct UsageSummary {
    rows: Vec<MeterReading>,
}

impl UsageSummary {
    /// Snapshots the current totals of every meter in every house.
    pub fn from_houses(houses: &[House]) -> Self {
        Self {
            rows: houses.iter().flat_map(House::readings).collect(),
        }
    }

    pub fn rows(&self) -> &[MeterReading] {
        &self.rows
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Usage Report ---")?;
        let mut current_house: Option<&str> = None;
        for row in &self.rows {
            if current_house != Some(row.house.as_str()) {
                writeln!(f, "House '{}' at tick {}:", row.house, row.tick)?;
                current_house = Some(row.house.as_str());
            }
            writeln!(f, "  {row}")?;
        }
        Ok(())
    }
}
