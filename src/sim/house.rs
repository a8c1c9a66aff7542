//! A house: meters, appliances, people, and the tick loop that drives them.

use std::rc::Rc;

use crate::appliances::appliance::SharedAppliance;
use crate::logging::Logger;
use crate::sim::meter::{SharedMeter, UtilityKind};
use crate::sim::person::SharedPerson;
use crate::sim::report::MeterReading;

/// Ticks per simulated day; houses report at every multiple.
pub const DAY_LENGTH: u64 = 96;

/// Hard cap on appliances per house.
pub const MAX_APPLIANCES: usize = 25;

/// Aggregates meters, appliances, and people, and owns the tick loop.
///
/// Meter kinds are unique per house, appliance and person entries are
/// reference-unique, and the appliance count never exceeds
/// [`MAX_APPLIANCES`]. Rejected additions log a warning; nothing here
/// panics.
pub struct House {
    name: String,
    current_tick: u64,
    meters: Vec<SharedMeter>,
    appliances: Vec<SharedAppliance>,
    people: Vec<SharedPerson>,
    log: Logger,
}

impl House {
    pub fn new(name: impl Into<String>, log: Logger) -> Self {
        Self::with_start_tick(name, 0, log)
    }

    /// House whose clock starts at an arbitrary tick offset.
    pub fn with_start_tick(name: impl Into<String>, start_tick: u64, log: Logger) -> Self {
        Self {
            name: name.into(),
            current_tick: start_tick,
            meters: Vec::new(),
            appliances: Vec::new(),
            people: Vec::new(),
            log,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn meters(&self) -> &[SharedMeter] {
        &self.meters
    }

    pub fn appliances(&self) -> &[SharedAppliance] {
        &self.appliances
    }

    pub fn people(&self) -> &[SharedPerson] {
        &self.people
    }

    pub fn appliance_count(&self) -> usize {
        self.appliances.len()
    }

    pub fn meter_of_kind(&self, kind: UtilityKind) -> Option<&SharedMeter> {
        self.meters.iter().find(|m| m.borrow().kind() == kind)
    }

    /// Adds a meter, rejecting a second meter of the same kind, and wires it
    /// into every appliance that uses that utility (replacing any meter the
    /// appliance already had for it).
    pub fn add_meter(&mut self, meter: SharedMeter) {
        let kind = meter.borrow().kind();
        if self.meter_of_kind(kind).is_some() {
            self.log.warning(format!(
                "meter not added to house '{}' - a '{kind}' meter already exists",
                self.name
            ));
            return;
        }
        self.log
            .message(format!("'{kind}' meter added to house '{}'", self.name));
        for appliance in &self.appliances {
            let uses_kind = appliance.borrow().usage(kind) != 0;
            if uses_kind {
                appliance.borrow_mut().add_meter(Rc::clone(&meter), true);
            }
        }
        self.meters.push(meter);
    }

    /// Adds an appliance, enforcing reference uniqueness and the appliance
    /// cap, and wires in every house meter matching a nonzero usage rate
    /// (replacing any appliance-local meter of that kind).
    pub fn add_appliance(&mut self, appliance: SharedAppliance) {
        if self.appliances.iter().any(|a| Rc::ptr_eq(a, &appliance)) {
            self.log.warning(format!(
                "appliance not added to house '{}' - already present",
                self.name
            ));
            return;
        }
        if self.appliances.len() >= MAX_APPLIANCES {
            self.log.warning(format!(
                "appliance not added to house '{}' - maximum of {MAX_APPLIANCES} appliances",
                self.name
            ));
            return;
        }
        self.log.message(format!(
            "'{}' added to house '{}'",
            appliance.borrow().label(),
            self.name
        ));
        for meter in &self.meters {
            let kind = meter.borrow().kind();
            let uses_kind = appliance.borrow().usage(kind) != 0;
            if uses_kind {
                appliance.borrow_mut().add_meter(Rc::clone(meter), true);
            }
        }
        self.appliances.push(appliance);
    }

    /// Removes an appliance by identity; warns when it is not present.
    pub fn remove_appliance(&mut self, appliance: &SharedAppliance) {
        match self
            .appliances
            .iter()
            .position(|a| Rc::ptr_eq(a, appliance))
        {
            Some(index) => {
                let removed = self.appliances.remove(index);
                self.log.message(format!(
                    "'{}' removed from house '{}'",
                    removed.borrow().label(),
                    self.name
                ));
            }
            None => self.log.warning(format!(
                "appliance not removed from house '{}' - not present",
                self.name
            )),
        }
    }

    /// Adds a person, enforcing reference uniqueness.
    pub fn add_person(&mut self, person: SharedPerson) {
        if self.people.iter().any(|p| Rc::ptr_eq(p, &person)) {
            self.log.warning(format!(
                "person not added to house '{}' - already present",
                self.name
            ));
            return;
        }
        self.log.message(format!(
            "'{}' added to house '{}'",
            person.borrow().name(),
            self.name
        ));
        self.people.push(person);
    }

    /// Removes a person by identity; warns when they are not present.
    pub fn remove_person(&mut self, person: &SharedPerson) {
        match self.people.iter().position(|p| Rc::ptr_eq(p, person)) {
            Some(index) => {
                let removed = self.people.remove(index);
                self.log.message(format!(
                    "'{}' removed from house '{}'",
                    removed.borrow().name(),
                    self.name
                ));
            }
            None => self.log.warning(format!(
                "person not removed from house '{}' - not present",
                self.name
            )),
        }
    }

    /// Advances the house by one tick.
    ///
    /// Appliances tick first (insertion order), then people resolve due
    /// tasks, then the clock advances. Returns the report rows when the new
    /// time lands on a day boundary, `None` otherwise.
    pub fn tick(&mut self) -> Option<Vec<MeterReading>> {
        for appliance in &self.appliances {
            appliance.borrow_mut().tick();
        }
        for person in &self.people {
            person.borrow_mut().tick(self);
        }
        self.current_tick += 1;
        if self.current_tick % DAY_LENGTH == 0 {
            Some(self.report())
        } else {
            None
        }
    }

    /// Current totals of every attached meter, in attachment order.
    pub fn readings(&self) -> Vec<MeterReading> {
        self.meters
            .iter()
            .map(|meter| {
                let meter = meter.borrow();
                MeterReading {
                    house: self.name.clone(),
                    tick: self.current_tick,
                    kind: meter.kind(),
                    consumed: meter.consumed(),
                    generated: meter.generated(),
                }
            })
            .collect()
    }

    /// Emits the periodic report as log messages and returns its rows.
    pub fn report(&self) -> Vec<MeterReading> {
        let rows = self.readings();
        self.log.message(format!(
            "--- house '{}' report at tick {} ---",
            self.name, self.current_tick
        ));
        for row in &rows {
            self.log.message(row.to_string());
        }
        rows
    }
}
