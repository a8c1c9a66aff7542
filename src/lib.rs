//! Household utility consumption simulator.
//!
//! Discrete-time simulation of appliances, meters, and people in houses:
//! appliances route per-tick usage to meters while their duty cycles run
//! down, people fire scheduled tasks against appliances, and each house
//! reports meter totals once per simulated day.

pub mod appliances;
pub mod config;
pub mod io;
pub mod logging;
/// Simulation engine, house aggregation, scheduling, and reporting modules.
pub mod sim;
pub mod telemetry;
