//! Simulation driver: runs one or more houses for a bounded tick count.

use std::thread;
use std::time::Duration;

use crate::sim::clock::Clock;
use crate::sim::house::{DAY_LENGTH, House};
use crate::sim::report::MeterReading;

/// Run parameters for one simulation.
#[derive(Debug, Clone)]
pub struct SimRun {
    /// Number of ticks to simulate.
    pub ticks: u64,
    /// Wall-clock delay between ticks, for human-paced output. `None` (the
    /// batch/test default) skips the sleep entirely; the delay never affects
    /// simulation semantics.
    pub pace: Option<Duration>,
    /// Run until the process is killed instead of stopping after `ticks`.
    pub daemon: bool,
}

impl Default for SimRun {
    fn default() -> Self {
        Self {
            ticks: DAY_LENGTH,
            pace: None,
            daemon: false,
        }
    }
}

/// Owns the houses of a scenario and drives their tick loops.
pub struct Simulation {
    houses: Vec<House>,
}

impl Simulation {
    pub fn new(houses: Vec<House>) -> Self {
        Self { houses }
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn houses_mut(&mut self) -> &mut [House] {
        &mut self.houses
    }

    /// Runs the simulation and returns every periodic report row produced.
    ///
    /// In daemon mode this never returns.
    pub fn run(&mut self, run: &SimRun) -> Vec<MeterReading> {
        if run.daemon {
            loop {
                self.step(run.pace);
            }
        }

        let mut rows = Vec::new();
        let mut clock = Clock::new(run.ticks);
        clock.run(|_| {
            rows.extend(self.step(run.pace));
        });
        rows
    }

    /// Advances every house by one tick, collecting any report rows.
    fn step(&mut self, pace: Option<Duration>) -> Vec<MeterReading> {
        let mut rows = Vec::new();
        for house in &mut self.houses {
            if let Some(report) = house.tick() {
                rows.extend(report);
            }
        }
        if let Some(delay) = pace {
            thread::sleep(delay);
        }
        rows
    }
}
