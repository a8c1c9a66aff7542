//! The appliance kind registry: defaults, allowed utility sets, task
//! bindings, and factory functions.
//!
//! Every appliance variant is a tag in [`ApplianceKind`]; configuration
//! refers to kinds by registry name (e.g. `"GasCooker"`) and the factories
//! here produce fully wired appliances.

use std::fmt;

use crate::appliances::appliance::Appliance;
use crate::appliances::task::{ApplianceTask, TaskAction};
use crate::appliances::types::{DutyCycle, UsageRates};
use crate::appliances::wind::GustyWind;
use crate::logging::Logger;
use crate::sim::meter::UtilityKind;

const NO_UTILITIES: &[UtilityKind] = &[];
const ELECTRIC_ONLY: &[UtilityKind] = &[UtilityKind::Electric];
const WATER_ONLY: &[UtilityKind] = &[UtilityKind::Water];
const ELECTRIC_GAS: &[UtilityKind] = &[UtilityKind::Electric, UtilityKind::Gas];
const ELECTRIC_WATER: &[UtilityKind] = &[UtilityKind::Electric, UtilityKind::Water];
const GAS_WATER: &[UtilityKind] = &[UtilityKind::Gas, UtilityKind::Water];
const ALL_UTILITIES: &[UtilityKind] =
    &[UtilityKind::Electric, UtilityKind::Gas, UtilityKind::Water];

/// The closed set of appliance variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplianceKind {
    Boiler,
    Dishwasher,
    ElectricCooker,
    ElectricShower,
    GasCooker,
    Kettle,
    NightLight,
    PowerShower,
    Refrigerator,
    Tv,
    WashingMachine,
    WindTurbine,
    WaterTurbine,
}

impl ApplianceKind {
    pub const ALL: [ApplianceKind; 13] = [
        ApplianceKind::Boiler,
        ApplianceKind::Dishwasher,
        ApplianceKind::ElectricCooker,
        ApplianceKind::ElectricShower,
        ApplianceKind::GasCooker,
        ApplianceKind::Kettle,
        ApplianceKind::NightLight,
        ApplianceKind::PowerShower,
        ApplianceKind::Refrigerator,
        ApplianceKind::Tv,
        ApplianceKind::WashingMachine,
        ApplianceKind::WindTurbine,
        ApplianceKind::WaterTurbine,
    ];

    /// Human-readable name used in log output and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ApplianceKind::Boiler => "Boiler",
            ApplianceKind::Dishwasher => "Dishwasher",
            ApplianceKind::ElectricCooker => "Electric cooker",
            ApplianceKind::ElectricShower => "Electric shower",
            ApplianceKind::GasCooker => "Gas cooker",
            ApplianceKind::Kettle => "Kettle",
            ApplianceKind::NightLight => "Night light",
            ApplianceKind::PowerShower => "Power shower",
            ApplianceKind::Refrigerator => "Refrigerator",
            ApplianceKind::Tv => "TV",
            ApplianceKind::WashingMachine => "Washing machine",
            ApplianceKind::WindTurbine => "Wind turbine",
            ApplianceKind::WaterTurbine => "Water turbine",
        }
    }

    /// The name configuration files use to select this kind.
    pub fn registry_name(&self) -> &'static str {
        match self {
            ApplianceKind::Boiler => "Boiler",
            ApplianceKind::Dishwasher => "Dishwasher",
            ApplianceKind::ElectricCooker => "ElectricCooker",
            ApplianceKind::ElectricShower => "ElectricShower",
            ApplianceKind::GasCooker => "GasCooker",
            ApplianceKind::Kettle => "Kettle",
            ApplianceKind::NightLight => "NightLight",
            ApplianceKind::PowerShower => "PowerShower",
            ApplianceKind::Refrigerator => "Refrigerator",
            ApplianceKind::Tv => "TV",
            ApplianceKind::WashingMachine => "WashingMachine",
            ApplianceKind::WindTurbine => "WindTurbine",
            ApplianceKind::WaterTurbine => "WaterTurbine",
        }
    }

    /// Resolves a registry name to a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.registry_name() == name)
    }

    /// Utility kinds this appliance may consume (positive rates).
    pub fn allowed_consumption(&self) -> &'static [UtilityKind] {
        match self {
            ApplianceKind::Boiler => ALL_UTILITIES,
            ApplianceKind::Dishwasher
            | ApplianceKind::ElectricShower
            | ApplianceKind::Kettle
            | ApplianceKind::WashingMachine => ELECTRIC_WATER,
            ApplianceKind::ElectricCooker
            | ApplianceKind::NightLight
            | ApplianceKind::Refrigerator
            | ApplianceKind::Tv => ELECTRIC_ONLY,
            ApplianceKind::GasCooker => ELECTRIC_GAS,
            ApplianceKind::PowerShower => GAS_WATER,
            ApplianceKind::WindTurbine => NO_UTILITIES,
            ApplianceKind::WaterTurbine => WATER_ONLY,
        }
    }

    /// Utility kinds this appliance may generate (negative rates).
    pub fn allowed_generation(&self) -> &'static [UtilityKind] {
        match self {
            ApplianceKind::WindTurbine | ApplianceKind::WaterTurbine => ELECTRIC_ONLY,
            _ => NO_UTILITIES,
        }
    }

    /// Default signed usage rates per tick.
    pub fn default_usage(&self) -> UsageRates {
        match self {
            ApplianceKind::Boiler => UsageRates::new(0, 1, 0),
            ApplianceKind::Dishwasher => UsageRates::new(2, 0, 1),
            ApplianceKind::ElectricCooker => UsageRates::new(5, 0, 0),
            ApplianceKind::ElectricShower => UsageRates::new(12, 0, 4),
            ApplianceKind::GasCooker => UsageRates::new(0, 4, 0),
            ApplianceKind::Kettle => UsageRates::new(20, 0, 1),
            ApplianceKind::NightLight => UsageRates::new(1, 0, 0),
            ApplianceKind::PowerShower => UsageRates::new(0, 10, 5),
            ApplianceKind::Refrigerator => UsageRates::new(1, 0, 0),
            ApplianceKind::Tv => UsageRates::new(1, 0, 0),
            ApplianceKind::WashingMachine => UsageRates::new(2, 0, 1),
            ApplianceKind::WindTurbine => UsageRates::new(-3, 0, 0),
            ApplianceKind::WaterTurbine => UsageRates::new(-4, 0, 1),
        }
    }

    /// Default duty-cycle length.
    pub fn default_duty_cycle(&self) -> DutyCycle {
        match self {
            ApplianceKind::Boiler
            | ApplianceKind::NightLight
            | ApplianceKind::Refrigerator
            | ApplianceKind::Tv
            | ApplianceKind::WindTurbine
            | ApplianceKind::WaterTurbine => DutyCycle::AlwaysOn,
            ApplianceKind::Dishwasher => DutyCycle::Fixed(6),
            ApplianceKind::ElectricCooker | ApplianceKind::GasCooker => DutyCycle::Fixed(4),
            ApplianceKind::ElectricShower
            | ApplianceKind::Kettle
            | ApplianceKind::PowerShower => DutyCycle::Fixed(1),
            ApplianceKind::WashingMachine => DutyCycle::Fixed(8),
        }
    }

    /// Whether the appliance starts running as soon as it is built.
    pub fn starts_on(&self) -> bool {
        matches!(self, ApplianceKind::WindTurbine)
    }

    /// The tasks registered on a freshly built appliance of this kind.
    fn tasks(&self) -> Vec<ApplianceTask> {
        match self {
            ApplianceKind::Boiler => vec![
                ApplianceTask::with_required_state("TurnOnBoiler", TaskAction::TurnOn, true, false),
                ApplianceTask::with_required_state("TurnOffBoiler", TaskAction::TurnOff, true, true),
            ],
            ApplianceKind::Dishwasher => vec![ApplianceTask::with_required_state(
                "WashDishes",
                TaskAction::TurnOn,
                false,
                false,
            )],
            ApplianceKind::ElectricCooker | ApplianceKind::GasCooker => {
                vec![ApplianceTask::with_required_state(
                    "Cook",
                    TaskAction::TurnOn,
                    true,
                    false,
                )]
            }
            ApplianceKind::ElectricShower | ApplianceKind::PowerShower => {
                vec![ApplianceTask::with_required_state(
                    "Shower",
                    TaskAction::TurnOn,
                    false,
                    false,
                )]
            }
            ApplianceKind::Kettle => vec![ApplianceTask::with_required_state(
                "Boil",
                TaskAction::TurnOn,
                false,
                false,
            )],
            ApplianceKind::NightLight => vec![
                ApplianceTask::with_required_state(
                    "TurnOnNightLight",
                    TaskAction::TurnOn,
                    false,
                    false,
                ),
                ApplianceTask::with_required_state(
                    "TurnOffNightLight",
                    TaskAction::TurnOff,
                    false,
                    true,
                ),
            ],
            ApplianceKind::Refrigerator | ApplianceKind::WindTurbine => Vec::new(),
            ApplianceKind::Tv => vec![
                ApplianceTask::with_required_state("TurnOnTV", TaskAction::TurnOn, false, false),
                ApplianceTask::with_required_state("TurnOffTV", TaskAction::TurnOff, false, true),
            ],
            ApplianceKind::WashingMachine => vec![ApplianceTask::with_required_state(
                "DoWashing",
                TaskAction::TurnOn,
                false,
                false,
            )],
            ApplianceKind::WaterTurbine => vec![
                ApplianceTask::with_required_state(
                    "TurnOnWaterTurbine",
                    TaskAction::TurnOn,
                    true,
                    false,
                ),
                ApplianceTask::with_required_state(
                    "TurnOffWaterTurbine",
                    TaskAction::TurnOff,
                    true,
                    true,
                ),
            ],
        }
    }
}

impl fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds an appliance of the given kind with explicit rates and duty cycle.
///
/// Installs the kind's task registry, wires the generation model where the
/// kind fluctuates, and starts the appliance when the kind runs from birth.
pub fn build(
    kind: ApplianceKind,
    usage: UsageRates,
    duty_cycle: DutyCycle,
    seed: u64,
    log: &Logger,
) -> Appliance {
    let mut appliance = Appliance::new(kind, usage, duty_cycle, log.clone());
    for task in kind.tasks() {
        appliance.add_task(task);
    }
    if kind == ApplianceKind::WindTurbine {
        appliance = appliance.with_generation_model(Box::new(GustyWind::new(seed)));
    }
    if kind.starts_on() {
        appliance.turn_on();
    }
    appliance
}

/// Builds an appliance of the given kind with catalog defaults.
pub fn standard(kind: ApplianceKind, log: &Logger) -> Appliance {
    build(kind, kind.default_usage(), kind.default_duty_cycle(), 0, log)
}
