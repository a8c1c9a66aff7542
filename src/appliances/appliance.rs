//! The appliance core: duty-cycle state machine, meter routing, and the
//! task registry.

use std::cell::RefCell;
use std::rc::Rc;

use crate::appliances::catalog::ApplianceKind;
use crate::appliances::task::{ApplianceTask, TaskAction};
use crate::appliances::types::{DutyCycle, UsageRates};
use crate::appliances::wind::GenerationModel;
use crate::logging::Logger;
use crate::sim::meter::{SharedMeter, UtilityKind};

/// Shared handle to an appliance: referenced by the owning house and by
/// scenario code that toggles it directly.
pub type SharedAppliance = Rc<RefCell<Appliance>>;

/// A household device with fixed usage rates and a duty cycle.
///
/// At most one meter per utility kind is attached at a time. Usage rates are
/// immutable after construction; on/off state and the elapsed-on counter
/// change every tick while the appliance runs.
pub struct Appliance {
    kind: ApplianceKind,
    usage: UsageRates,
    duty_cycle: DutyCycle,
    is_on: bool,
    elapsed_on: u32,
    meters: Vec<SharedMeter>,
    tasks: Vec<ApplianceTask>,
    generation: Option<Box<dyn GenerationModel>>,
    log: Logger,
}

impl Appliance {
    /// Creates an appliance, validating usage rates against the kind's
    /// allowed consumption and generation sets.
    ///
    /// A rate violating its allowed set is logged as an error and dropped to
    /// zero rather than aborting construction, so one bad definition cannot
    /// take down a whole scenario.
    pub fn new(kind: ApplianceKind, usage: UsageRates, duty_cycle: DutyCycle, log: Logger) -> Self {
        let usage = validate_usage(kind, usage, &log);
        let duty_cycle = match duty_cycle {
            DutyCycle::Fixed(0) => {
                log.error(format!(
                    "'{}' duty cycle length must be positive; treating as always on",
                    kind.label()
                ));
                DutyCycle::AlwaysOn
            }
            other => other,
        };
        Self {
            kind,
            usage,
            duty_cycle,
            is_on: false,
            elapsed_on: 0,
            meters: Vec::new(),
            tasks: Vec::new(),
            generation: None,
            log,
        }
    }

    /// Installs a generation model applied to generating rates each tick.
    pub fn with_generation_model(mut self, model: Box<dyn GenerationModel>) -> Self {
        self.generation = Some(model);
        self
    }

    /// Wraps the appliance in a shared handle.
    pub fn shared(self) -> SharedAppliance {
        Rc::new(RefCell::new(self))
    }

    pub fn kind(&self) -> ApplianceKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn elapsed_on(&self) -> u32 {
        self.elapsed_on
    }

    pub fn duty_cycle(&self) -> DutyCycle {
        self.duty_cycle
    }

    /// Signed per-tick rate for a utility kind; zero when unused.
    pub fn usage(&self, kind: UtilityKind) -> i64 {
        self.usage.get(kind)
    }

    /// Starts the duty cycle. A second call while already running does not
    /// restart the cycle.
    pub fn turn_on(&mut self) {
        if !self.is_on {
            self.elapsed_on = 0;
            self.is_on = true;
        }
    }

    /// Stops the appliance and resets the elapsed-on counter. Idempotent.
    pub fn turn_off(&mut self) {
        self.is_on = false;
        self.elapsed_on = 0;
    }

    /// Attaches a meter. A meter of the same kind that is already attached
    /// blocks the new one unless `replace_if_exists` is set, in which case
    /// the old meter is detached first.
    pub fn add_meter(&mut self, meter: SharedMeter, replace_if_exists: bool) {
        let kind = meter.borrow().kind();
        if let Some(existing) = self.meter_of_kind(kind) {
            if !replace_if_exists {
                self.log.warning(format!(
                    "meter not connected to '{}' - a '{kind}' meter is already attached",
                    self.label()
                ));
                return;
            }
            let existing = Rc::clone(existing);
            self.meters.retain(|m| !Rc::ptr_eq(m, &existing));
        }
        self.log.message(format!(
            "'{kind}' meter connected to '{}'",
            self.label()
        ));
        self.meters.push(meter);
    }

    /// Detaches a meter by identity; warns when it is not attached.
    pub fn remove_meter(&mut self, meter: &SharedMeter) {
        match self.meters.iter().position(|m| Rc::ptr_eq(m, meter)) {
            Some(index) => {
                let removed = self.meters.remove(index);
                self.log.message(format!(
                    "'{}' meter disconnected from '{}'",
                    removed.borrow().kind(),
                    self.label()
                ));
            }
            None => self.log.warning(format!(
                "meter not disconnected from '{}' - not attached",
                self.label()
            )),
        }
    }

    pub fn meter_of_kind(&self, kind: UtilityKind) -> Option<&SharedMeter> {
        self.meters
            .iter()
            .find(|m| m.borrow().kind() == kind)
    }

    /// Registers a task; duplicate names are rejected with an error event.
    pub fn add_task(&mut self, task: ApplianceTask) {
        if self.task(task.name()).is_some() {
            self.log.error(format!(
                "task name '{}' already exists on '{}'",
                task.name(),
                self.label()
            ));
            return;
        }
        self.tasks.push(task);
    }

    /// Looks up a registered task by name.
    pub fn task(&self, name: &str) -> Option<&ApplianceTask> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Runs a registered task by name, returning whether it ran.
    ///
    /// An unknown name logs a warning and returns `false`; nothing can
    /// unwind out of a task invocation.
    pub fn run_task(&mut self, name: &str) -> bool {
        let Some(task) = self.task(name) else {
            self.log.warning(format!(
                "task '{name}' is not registered on '{}'",
                self.label()
            ));
            return false;
        };
        match task.action() {
            TaskAction::TurnOn => self.turn_on(),
            TaskAction::TurnOff => self.turn_off(),
        }
        self.log
            .message(format!("task '{name}' ran on '{}'", self.label()));
        true
    }

    /// Advances the appliance by one tick.
    ///
    /// While on, routes every nonzero usage rate to the attached meter of
    /// that kind, then advances the elapsed-on counter; when the counter
    /// reaches a fixed duty length the appliance shuts itself off.
    pub fn tick(&mut self) {
        if self.is_on {
            for (kind, nominal) in self.usage.entries() {
                let rate = if nominal < 0 {
                    match self.generation.as_mut() {
                        Some(model) => model.rate(nominal),
                        None => nominal,
                    }
                } else {
                    nominal
                };
                self.route(kind, rate);
            }
            self.elapsed_on += 1;

            if let DutyCycle::Fixed(length) = self.duty_cycle
                && self.elapsed_on == length
            {
                self.turn_off();
                self.log.message(format!(
                    "'{}' duty cycle has completed and has turned off automatically",
                    self.label()
                ));
            }
        }
    }

    /// Routes one signed rate to the attached meter of its kind.
    fn route(&self, kind: UtilityKind, rate: i64) {
        if rate == 0 {
            return;
        }
        let Some(meter) = self.meter_of_kind(kind) else {
            self.log.warning(format!(
                "attempted meter increment but no '{kind}' meter connected to '{}'",
                self.label()
            ));
            return;
        };
        let mut meter = meter.borrow_mut();
        if rate > 0 {
            meter.increment_consumed_by(rate as u64);
        } else if meter.can_generate() {
            meter.increment_generated_by(rate.unsigned_abs());
        } else {
            self.log.warning(format!(
                "'{kind}' meter cannot record generation from '{}'",
                self.label()
            ));
        }
    }
}

/// Drops rates that violate the kind's allowed consumption/generation sets.
fn validate_usage(kind: ApplianceKind, mut usage: UsageRates, log: &Logger) -> UsageRates {
    for (utility, rate) in usage.entries() {
        if rate > 0 && !kind.allowed_consumption().contains(&utility) {
            log.error(format!(
                "'{}' cannot consume {utility}; rate dropped",
                kind.label()
            ));
            usage.set(utility, 0);
        }
        if rate < 0 && !kind.allowed_generation().contains(&utility) {
            log.error(format!(
                "'{}' cannot generate {utility}; rate dropped",
                kind.label()
            ));
            usage.set(utility, 0);
        }
    }
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Severity;
    use crate::sim::meter::Meter;

    fn boiler(log: &Logger) -> Appliance {
        Appliance::new(
            ApplianceKind::Boiler,
            UsageRates::new(0, 1, 0),
            DutyCycle::AlwaysOn,
            log.clone(),
        )
    }

    #[test]
    fn duty_cycle_terminates_after_exact_length() {
        let log = Logger::disabled();
        let mut dishwasher = Appliance::new(
            ApplianceKind::Dishwasher,
            UsageRates::new(2, 0, 1),
            DutyCycle::Fixed(6),
            log,
        );
        dishwasher.turn_on();
        for _ in 0..5 {
            dishwasher.tick();
            assert!(dishwasher.is_on());
        }
        dishwasher.tick();
        assert!(!dishwasher.is_on());
        assert_eq!(dishwasher.elapsed_on(), 0);
    }

    #[test]
    fn always_on_never_auto_stops() {
        let log = Logger::disabled();
        let mut boiler = boiler(&log);
        boiler.turn_on();
        for _ in 0..500 {
            boiler.tick();
        }
        assert!(boiler.is_on());
    }

    #[test]
    fn second_turn_on_does_not_restart_cycle() {
        let log = Logger::disabled();
        let mut cooker = Appliance::new(
            ApplianceKind::ElectricCooker,
            UsageRates::new(5, 0, 0),
            DutyCycle::Fixed(4),
            log,
        );
        cooker.turn_on();
        cooker.tick();
        cooker.tick();
        assert_eq!(cooker.elapsed_on(), 2);
        cooker.turn_on();
        assert_eq!(cooker.elapsed_on(), 2);
    }

    #[test]
    fn tick_routes_usage_to_attached_meters() {
        let log = Logger::disabled();
        let gas = Meter::consumer(UtilityKind::Gas).shared();
        let mut boiler = boiler(&log);
        boiler.add_meter(gas.clone(), false);

        boiler.tick();
        assert_eq!(gas.borrow().consumed(), 0);

        boiler.turn_on();
        for _ in 0..5 {
            boiler.tick();
        }
        assert_eq!(gas.borrow().consumed(), 5);
    }

    #[test]
    fn missing_meter_warns_and_skips() {
        let (log, sink) = Logger::capturing();
        let mut boiler = boiler(&log);
        boiler.turn_on();
        boiler.tick();
        assert!(sink.contains(Severity::Warning, "no 'Gas' meter connected"));
    }

    #[test]
    fn generation_to_consumer_meter_warns() {
        let (log, sink) = Logger::capturing();
        let electric = Meter::consumer(UtilityKind::Electric).shared();
        let mut turbine = Appliance::new(
            ApplianceKind::WaterTurbine,
            UsageRates::new(-4, 0, 1),
            DutyCycle::AlwaysOn,
            log,
        );
        turbine.add_meter(electric.clone(), false);
        turbine.turn_on();
        turbine.tick();
        assert_eq!(electric.borrow().generated(), 0);
        assert!(sink.contains(Severity::Warning, "cannot record generation"));
    }

    #[test]
    fn generation_routed_to_generator_meter() {
        let log = Logger::disabled();
        let electric = Meter::generator(UtilityKind::Electric).shared();
        let water = Meter::consumer(UtilityKind::Water).shared();
        let mut turbine = Appliance::new(
            ApplianceKind::WaterTurbine,
            UsageRates::new(-4, 0, 1),
            DutyCycle::AlwaysOn,
            log,
        );
        turbine.add_meter(electric.clone(), false);
        turbine.add_meter(water.clone(), false);
        turbine.turn_on();
        turbine.tick();
        assert_eq!(electric.borrow().generated(), 4);
        assert_eq!(water.borrow().consumed(), 1);
    }

    #[test]
    fn duplicate_meter_kind_rejected_without_replace() {
        let (log, sink) = Logger::capturing();
        let first = Meter::consumer(UtilityKind::Gas).shared();
        let second = Meter::consumer(UtilityKind::Gas).shared();
        let mut boiler = boiler(&log);
        boiler.add_meter(first.clone(), false);
        boiler.add_meter(second, false);
        assert!(sink.contains(Severity::Warning, "already attached"));
        assert!(Rc::ptr_eq(
            boiler.meter_of_kind(UtilityKind::Gas).expect("meter"),
            &first
        ));
    }

    #[test]
    fn replace_swaps_meter_of_same_kind() {
        let log = Logger::disabled();
        let first = Meter::consumer(UtilityKind::Gas).shared();
        let second = Meter::consumer(UtilityKind::Gas).shared();
        let mut boiler = boiler(&log);
        boiler.add_meter(first, false);
        boiler.add_meter(second.clone(), true);
        assert!(Rc::ptr_eq(
            boiler.meter_of_kind(UtilityKind::Gas).expect("meter"),
            &second
        ));
    }

    #[test]
    fn remove_unattached_meter_warns() {
        let (log, sink) = Logger::capturing();
        let meter = Meter::consumer(UtilityKind::Gas).shared();
        let mut boiler = boiler(&log);
        boiler.remove_meter(&meter);
        assert!(sink.contains(Severity::Warning, "not attached"));
    }

    #[test]
    fn duplicate_task_name_rejected() {
        let (log, sink) = Logger::capturing();
        let mut boiler = boiler(&log);
        boiler.add_task(ApplianceTask::new("TurnOnBoiler", TaskAction::TurnOn, true));
        boiler.add_task(ApplianceTask::new("TurnOnBoiler", TaskAction::TurnOn, true));
        assert!(sink.contains(Severity::Error, "already exists"));
    }

    #[test]
    fn run_task_executes_bound_action() {
        let log = Logger::disabled();
        let mut boiler = boiler(&log);
        boiler.add_task(ApplianceTask::new("TurnOnBoiler", TaskAction::TurnOn, true));
        assert!(boiler.run_task("TurnOnBoiler"));
        assert!(boiler.is_on());
    }

    #[test]
    fn run_unknown_task_fails() {
        let (log, sink) = Logger::capturing();
        let mut boiler = boiler(&log);
        assert!(!boiler.run_task("Cook"));
        assert!(sink.contains(Severity::Warning, "not registered"));
    }

    #[test]
    fn disallowed_consumption_rate_dropped() {
        let (log, sink) = Logger::capturing();
        let fridge = Appliance::new(
            ApplianceKind::Refrigerator,
            UsageRates::new(1, 2, 0),
            DutyCycle::AlwaysOn,
            log,
        );
        assert_eq!(fridge.usage(UtilityKind::Gas), 0);
        assert_eq!(fridge.usage(UtilityKind::Electric), 1);
        assert!(sink.contains(Severity::Error, "cannot consume Gas"));
    }

    #[test]
    fn disallowed_generation_rate_dropped() {
        let (log, sink) = Logger::capturing();
        let tv = Appliance::new(
            ApplianceKind::Tv,
            UsageRates::new(-1, 0, 0),
            DutyCycle::AlwaysOn,
            log,
        );
        assert_eq!(tv.usage(UtilityKind::Electric), 0);
        assert!(sink.contains(Severity::Error, "cannot generate Electric"));
    }
}
