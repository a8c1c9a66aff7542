//! Household simulator entry point — CLI wiring and config-driven runs.

use std::path::Path;
use std::process;
use std::time::Duration;

use home_sim::config::{self, ScenarioConfig};
use home_sim::io::export::export_csv;
use home_sim::logging::Logger;
use home_sim::sim::engine::{SimRun, Simulation};
use home_sim::sim::report::UsageSummary;
use home_sim::telemetry::init_tracing;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    ticks: Option<u64>,
    seed_override: Option<u64>,
    pace_ms: Option<u64>,
    daemon: bool,
    report_out: Option<String>,
}

fn print_help() {
    eprintln!("home-sim — Household utility consumption simulator");
    eprintln!();
    eprintln!("Usage: home-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>     Load scenario from TOML config file");
    eprintln!("  --preset <name>       Use a built-in preset (baseline, turbines)");
    eprintln!("  --ticks <u64>         Override total tick count");
    eprintln!("  --seed <u64>          Override random seed");
    eprintln!("  --pace-ms <u64>       Sleep between ticks, for watchable output");
    eprintln!("  --daemon              Run until killed instead of stopping after --ticks");
    eprintln!("  --report-out <path>   Export periodic report rows to CSV");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        ticks: None,
        seed_override: None,
        pace_ms: None,
        daemon: false,
        report_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --ticks requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(t) = args[i].parse::<u64>() {
                    cli.ticks = Some(t);
                } else {
                    eprintln!("error: --ticks value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--pace-ms" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --pace-ms requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(ms) = args[i].parse::<u64>() {
                    cli.pace_ms = Some(ms);
                } else {
                    eprintln!("error: --pace-ms value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--daemon" => {
                cli.daemon = true;
            }
            "--report-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --report-out requires a path argument");
                    process::exit(1);
                }
                cli.report_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply CLI overrides
    if let Some(ticks) = cli.ticks {
        scenario.simulation.ticks = ticks;
    }
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ms) = cli.pace_ms {
        scenario.simulation.pace_ms = ms;
    }
    if cli.daemon {
        scenario.simulation.daemon = true;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build and run
    let log = Logger::default();
    let houses = config::build_houses(&scenario, &log);
    if houses.is_empty() {
        eprintln!("error: no houses in scenario");
        process::exit(1);
    }

    let run = SimRun {
        ticks: scenario.simulation.ticks,
        pace: match scenario.simulation.pace_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        },
        daemon: scenario.simulation.daemon,
    };
    let mut sim = Simulation::new(houses);
    let rows = sim.run(&run);

    // Print final usage summary
    let summary = UsageSummary::from_houses(sim.houses());
    println!("\n{summary}");

    // Export CSV if requested
    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_csv(&rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Report rows written to {path}");
    }
}
