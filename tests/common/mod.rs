//! Shared test fixtures for integration tests.

use std::rc::Rc;

use home_sim::appliances::SharedAppliance;
use home_sim::appliances::catalog::{self, ApplianceKind};
use home_sim::logging::{Logger, MemorySink};
use home_sim::sim::house::House;
use home_sim::sim::meter::{Meter, SharedMeter, UtilityKind};

/// Logger with a memory sink for asserting on the event stream.
pub fn capturing_logger() -> (Logger, Rc<MemorySink>) {
    Logger::capturing()
}

/// Fresh consumption-only meter handle.
pub fn consumer_meter(kind: UtilityKind) -> SharedMeter {
    Meter::consumer(kind).shared()
}

/// A boiler with the catalog defaults (gas usage 1, always on), not yet
/// turned on.
pub fn default_boiler(log: &Logger) -> SharedAppliance {
    catalog::standard(ApplianceKind::Boiler, log).shared()
}

/// A dishwasher with the catalog defaults (electric 2, water 1, duty 6).
pub fn default_dishwasher(log: &Logger) -> SharedAppliance {
    catalog::standard(ApplianceKind::Dishwasher, log).shared()
}

/// House containing a single boiler wired to a gas meter.
///
/// Returns `(house, boiler, gas_meter)`.
pub fn boiler_house(log: &Logger) -> (House, SharedAppliance, SharedMeter) {
    let mut house = House::new("Boiler house", log.clone());
    let gas = consumer_meter(UtilityKind::Gas);
    let boiler = default_boiler(log);
    house.add_meter(gas.clone());
    house.add_appliance(boiler.clone());
    (house, boiler, gas)
}
