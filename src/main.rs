//! Solar suitability entry point: CLI wiring and config-driven assessment.

use std::path::Path;
use std::process;

use solar_suitability::config::ScenarioConfig;
use solar_suitability::engine::{Assessment, Engine};
use solar_suitability::io::catalog::load_catalog;
use solar_suitability::io::export::export_csv;
use solar_suitability::region::{IncentiveEntry, RegionTable};
use solar_suitability::telemetry;
use tracing::{error, info};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    incentives_path: Option<String>,
    projection_out: Option<String>,
    horizon_override: Option<u32>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("solar-suitability: rooftop solar suitability and savings estimator");
    eprintln!();
    eprintln!("Usage: solar-suitability [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --incentives <path>      Replace the incentive catalog with a CSV file");
    eprintln!("  --horizon <years>        Override the savings projection horizon");
    eprintln!("  --projection-out <path>  Export the yearly projection to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the assessment");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        incentives_path: None,
        projection_out: None,
        horizon_override: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
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
                cli.scenario_path =
                    Some(next_value(&args, i, "--scenario", "a path argument").to_string());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(next_value(&args, i, "--preset", "a name argument").to_string());
            }
            "--incentives" => {
                i += 1;
                cli.incentives_path =
                    Some(next_value(&args, i, "--incentives", "a path argument").to_string());
            }
            "--projection-out" => {
                i += 1;
                cli.projection_out =
                    Some(next_value(&args, i, "--projection-out", "a path argument").to_string());
            }
            "--horizon" => {
                i += 1;
                let raw = next_value(&args, i, "--horizon", "a year count");
                match raw.parse::<u32>() {
                    Ok(h) if h > 0 => cli.horizon_override = Some(h),
                    _ => {
                        eprintln!("error: --horizon value \"{raw}\" is not a positive integer");
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = next_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

/// Builds the engine and assesses the configured location.
fn run_assessment(
    scenario: &ScenarioConfig,
    incentives_path: Option<&str>,
) -> (Engine<RegionTable>, Assessment) {
    let mut table = scenario.region_table();
    if let Some(path) = incentives_path {
        match load_catalog(Path::new(path)) {
            Ok(records) => {
                info!(count = records.len(), path, "loaded incentive catalog");
                table =
                    table.with_incentives(records.into_iter().map(IncentiveEntry::from_record).collect());
            }
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        }
    }

    let engine = Engine::new(table, scenario.settings());
    match engine.assess(&scenario.request()) {
        Ok(assessment) => (engine, assessment),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn main() {
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

    if let Some(h) = cli.horizon_override {
        scenario.overrides.horizon_years = Some(h);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if let Err(e) = telemetry::init(&scenario.logging.level) {
        eprintln!("{e}");
        process::exit(1);
    }

    #[cfg_attr(not(feature = "api"), expect(unused_variables))]
    let (engine, assessment) = run_assessment(&scenario, cli.incentives_path.as_deref());

    println!("{assessment}");

    if let Some(ref path) = cli.projection_out {
        if let Err(e) = export_csv(assessment.projection.years(), Path::new(path)) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        info!("projection written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_suitability::api::AppState { engine, assessment });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("failed to create tokio runtime: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = rt.block_on(solar_suitability::api::serve(state, addr)) {
            error!("server error: {e}");
            process::exit(1);
        }
    }
}
