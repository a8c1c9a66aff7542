//! TOML-based scenario configuration, preset definitions, and the
//! registry-driven house builder.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::appliances::catalog::{self, ApplianceKind};
use crate::appliances::types::DutyCycle;
use crate::logging::Logger;
use crate::sim::house::{House, MAX_APPLIANCES};
use crate::sim::meter::{Meter, UtilityKind};
use crate::sim::person::{Person, PersonTask};

/// Seed stride between appliances so each fluctuating device draws from its
/// own RNG stream.
const APPLIANCE_SEED_STRIDE: u64 = 57;

/// Top-level scenario configuration parsed from TOML.
///
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Houses with their meters, appliances, and people.
    #[serde(default, rename = "house")]
    pub houses: Vec<HouseConfig>,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of ticks to simulate (must be > 0).
    pub ticks: u64,
    /// Master random seed for fluctuating generation.
    pub seed: u64,
    /// Wall-clock delay between ticks in milliseconds (0 = no pacing).
    pub pace_ms: u64,
    /// Run until the process is killed instead of stopping after `ticks`.
    pub daemon: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 96,
            seed: 42,
            pace_ms: 0,
            daemon: false,
        }
    }
}

/// One house with its meters, appliances, and people.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseConfig {
    pub name: String,
    /// Tick the house clock starts at.
    #[serde(default)]
    pub start_tick: u64,
    #[serde(default, rename = "meter")]
    pub meters: Vec<MeterConfig>,
    #[serde(default, rename = "appliance")]
    pub appliances: Vec<ApplianceConfig>,
    #[serde(default, rename = "person")]
    pub people: Vec<PersonConfig>,
}

/// One house-level meter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeterConfig {
    pub kind: UtilityKind,
    #[serde(default)]
    pub consumed: u64,
    #[serde(default)]
    pub generated: u64,
    #[serde(default)]
    pub can_generate: bool,
}

/// One appliance, by registry name, with optional overrides of the catalog
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceConfig {
    /// Registry name, e.g. `"GasCooker"`.
    pub kind: String,
    #[serde(default)]
    pub electric: Option<i64>,
    #[serde(default)]
    pub gas: Option<i64>,
    #[serde(default)]
    pub water: Option<i64>,
    /// Duty-cycle length override in ticks.
    #[serde(default)]
    pub duty_ticks: Option<u32>,
    /// Force the appliance to never shut off automatically.
    #[serde(default)]
    pub always_on: Option<bool>,
}

impl ApplianceConfig {
    /// Appliance entry using catalog defaults only.
    pub fn standard(kind: ApplianceKind) -> Self {
        Self {
            kind: kind.registry_name().to_string(),
            electric: None,
            gas: None,
            water: None,
            duty_ticks: None,
            always_on: None,
        }
    }
}

/// One person with their scheduled tasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonConfig {
    pub name: String,
    pub age: u32,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
}

/// One scheduled task: the named appliance task to attempt at a tick.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    pub task: String,
    pub tick: u64,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: one demo house with boiler, gas
    /// cooker, and TV, three meters, one adult, and one child.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            houses: vec![HouseConfig {
                name: "Demo house".to_string(),
                start_tick: 0,
                meters: vec![
                    MeterConfig {
                        kind: UtilityKind::Electric,
                        consumed: 0,
                        generated: 0,
                        can_generate: false,
                    },
                    MeterConfig {
                        kind: UtilityKind::Gas,
                        consumed: 0,
                        generated: 0,
                        can_generate: false,
                    },
                    MeterConfig {
                        kind: UtilityKind::Water,
                        consumed: 0,
                        generated: 0,
                        can_generate: false,
                    },
                ],
                appliances: vec![
                    ApplianceConfig::standard(ApplianceKind::Boiler),
                    ApplianceConfig::standard(ApplianceKind::GasCooker),
                    ApplianceConfig::standard(ApplianceKind::Tv),
                ],
                people: vec![
                    PersonConfig {
                        name: "Steven".to_string(),
                        age: 52,
                        tasks: vec![
                            TaskConfig {
                                task: "TurnOnBoiler".to_string(),
                                tick: 5,
                            },
                            TaskConfig {
                                task: "Cook".to_string(),
                                tick: 16,
                            },
                            TaskConfig {
                                task: "TurnOffBoiler".to_string(),
                                tick: 100,
                            },
                        ],
                    },
                    PersonConfig {
                        name: "Richard".to_string(),
                        age: 12,
                        tasks: vec![TaskConfig {
                            task: "Cook".to_string(),
                            tick: 16,
                        }],
                    },
                ],
            }],
        }
    }

    /// Returns the turbines preset: a generation-heavy house exercising the
    /// wind and water turbines against a generating electric meter.
    pub fn turbines() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            houses: vec![HouseConfig {
                name: "Riverside house".to_string(),
                start_tick: 0,
                meters: vec![
                    MeterConfig {
                        kind: UtilityKind::Electric,
                        consumed: 0,
                        generated: 0,
                        can_generate: true,
                    },
                    MeterConfig {
                        kind: UtilityKind::Water,
                        consumed: 0,
                        generated: 0,
                        can_generate: false,
                    },
                ],
                appliances: vec![
                    ApplianceConfig::standard(ApplianceKind::WindTurbine),
                    ApplianceConfig::standard(ApplianceKind::WaterTurbine),
                    ApplianceConfig::standard(ApplianceKind::Refrigerator),
                ],
                people: vec![PersonConfig {
                    name: "Alex".to_string(),
                    age: 34,
                    tasks: vec![
                        TaskConfig {
                            task: "TurnOnWaterTurbine".to_string(),
                            tick: 2,
                        },
                        TaskConfig {
                            task: "TurnOffWaterTurbine".to_string(),
                            tick: 50,
                        },
                    ],
                }],
            }],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "turbines"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "turbines" => Ok(Self::turbines()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.simulation.ticks == 0 && !self.simulation.daemon {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }
        if self.houses.is_empty() {
            errors.push(ConfigError {
                field: "house".into(),
                message: "at least one house is required".into(),
            });
        }

        for (hi, house) in self.houses.iter().enumerate() {
            if house.name.is_empty() {
                errors.push(ConfigError {
                    field: format!("house[{hi}].name"),
                    message: "must not be empty".into(),
                });
            }
            if self.houses[..hi].iter().any(|h| h.name == house.name) {
                errors.push(ConfigError {
                    field: format!("house[{hi}].name"),
                    message: format!("duplicate house name \"{}\"", house.name),
                });
            }

            for (mi, meter) in house.meters.iter().enumerate() {
                if house.meters[..mi].iter().any(|m| m.kind == meter.kind) {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].meter[{mi}].kind"),
                        message: format!("duplicate meter kind \"{}\"", meter.kind),
                    });
                }
                if meter.generated > 0 && !meter.can_generate {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].meter[{mi}].generated"),
                        message: "must be 0 unless can_generate is set".into(),
                    });
                }
            }

            if house.appliances.len() > MAX_APPLIANCES {
                errors.push(ConfigError {
                    field: format!("house[{hi}].appliance"),
                    message: format!("at most {MAX_APPLIANCES} appliances per house"),
                });
            }
            for (ai, appliance) in house.appliances.iter().enumerate() {
                if ApplianceKind::from_name(&appliance.kind).is_none() {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].appliance[{ai}].kind"),
                        message: format!("unknown appliance kind \"{}\"", appliance.kind),
                    });
                }
                if appliance.duty_ticks == Some(0) {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].appliance[{ai}].duty_ticks"),
                        message: "must be > 0".into(),
                    });
                }
                if appliance.always_on == Some(false) && appliance.duty_ticks.is_none() {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].appliance[{ai}].always_on"),
                        message: "disabling always_on requires duty_ticks".into(),
                    });
                }
            }

            for (pi, person) in house.people.iter().enumerate() {
                if person.name.is_empty() {
                    errors.push(ConfigError {
                        field: format!("house[{hi}].person[{pi}].name"),
                        message: "must not be empty".into(),
                    });
                }
                for (ti, task) in person.tasks.iter().enumerate() {
                    if task.task.is_empty() {
                        errors.push(ConfigError {
                            field: format!("house[{hi}].person[{pi}].task[{ti}].task"),
                            message: "must not be empty".into(),
                        });
                    }
                    if task.tick < house.start_tick {
                        errors.push(ConfigError {
                            field: format!("house[{hi}].person[{pi}].task[{ti}].tick"),
                            message: format!(
                                "must be >= house start_tick ({})",
                                house.start_tick
                            ),
                        });
                    }
                }
            }
        }

        errors
    }
}

/// Constructs the populated object graph a scenario describes.
///
/// Invalid entries (bad meter counters, unknown appliance kinds, tasks
/// scheduled in the past) are logged as errors and skipped; one bad
/// definition never aborts the build.
pub fn build_houses(config: &ScenarioConfig, log: &Logger) -> Vec<House> {
    let mut houses = Vec::with_capacity(config.houses.len());
    for (hi, house_config) in config.houses.iter().enumerate() {
        let mut house = House::with_start_tick(&house_config.name, house_config.start_tick, log.clone());

        for meter_config in &house_config.meters {
            match Meter::new(
                meter_config.kind,
                meter_config.consumed,
                meter_config.can_generate,
                meter_config.generated,
            ) {
                Ok(meter) => house.add_meter(meter.shared()),
                Err(e) => log.error(format!(
                    "meter skipped in house '{}': {e}",
                    house_config.name
                )),
            }
        }

        for (ai, appliance_config) in house_config.appliances.iter().enumerate() {
            let Some(kind) = ApplianceKind::from_name(&appliance_config.kind) else {
                log.error(format!(
                    "appliance skipped in house '{}': unknown kind \"{}\"",
                    house_config.name, appliance_config.kind
                ));
                continue;
            };

            let mut usage = kind.default_usage();
            if let Some(electric) = appliance_config.electric {
                usage.electric = electric;
            }
            if let Some(gas) = appliance_config.gas {
                usage.gas = gas;
            }
            if let Some(water) = appliance_config.water {
                usage.water = water;
            }

            let duty_cycle = if appliance_config.always_on == Some(true) {
                DutyCycle::AlwaysOn
            } else if let Some(ticks) = appliance_config.duty_ticks {
                DutyCycle::Fixed(ticks)
            } else {
                kind.default_duty_cycle()
            };

            let seed = config
                .simulation
                .seed
                .wrapping_add((hi as u64).wrapping_mul(MAX_APPLIANCES as u64))
                .wrapping_add((ai as u64).wrapping_mul(APPLIANCE_SEED_STRIDE));
            let appliance = catalog::build(kind, usage, duty_cycle, seed, log);
            house.add_appliance(appliance.shared());
        }

        for person_config in &house_config.people {
            let mut person = Person::new(&person_config.name, person_config.age, log.clone());
            for task_config in &person_config.tasks {
                match PersonTask::new(&task_config.task, task_config.tick, &house) {
                    Ok(task) => person.add_task(task),
                    Err(e) => log.error(format!(
                        "task skipped for '{}': {e}",
                        person_config.name
                    )),
                }
            }
            house.add_person(person.shared());
        }

        houses.push(house);
    }
    houses
}
