//! CryoCore simulator entry point: CLI wiring and config-driven controller
//! construction.

use std::path::Path;
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use cryocore_sim::config::ScenarioConfig;
use cryocore_sim::io::export::export_csv;
use cryocore_sim::reporting::TracingSink;
use cryocore_sim::sim::kpi::RunSummary;
use cryocore_sim::sim::types::{SystemStatus, TickResult};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    ticks_override: Option<usize>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    log_json: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("cryocore-sim: thermoelectric cooling installation simulator");
    eprintln!();
    eprintln!("Usage: cryocore-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --ticks <usize>          Override number of ticks");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --telemetry-out <path>   Export tick results to CSV");
    eprintln!("  --log-json               Emit logs as JSON lines");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, exiting if it is missing.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_or_exit<T: std::str::FromStr>(value: &str, flag: &str, kind: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("error: {flag} value \"{value}\" is not a valid {kind}");
        process::exit(1);
    })
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        ticks_override: None,
        seed_override: None,
        telemetry_out: None,
        log_json: false,
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
                cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").to_string());
            }
            "--ticks" => {
                let v = flag_value(&args, &mut i, "a usize argument");
                cli.ticks_override = Some(parse_or_exit(v, "--ticks", "usize"));
            }
            "--seed" => {
                let v = flag_value(&args, &mut i, "a u64 argument");
                cli.seed_override = Some(parse_or_exit(v, "--seed", "u64"));
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--log-json" => {
                cli.log_json = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let v = flag_value(&args, &mut i, "a u16 argument");
                cli.port = parse_or_exit(v, "--port", "u16");
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

/// Installs the global tracing subscriber. Logs go to stderr so stdout
/// carries only the tick table and the summary.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_scenario(cli: &CliArgs) -> ScenarioConfig {
    // --scenario takes priority, then --preset, then baseline default
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };
    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    scenario
}

/// Runs the scenario and returns results, summary and the final status.
fn run_simulation(
    scenario: &ScenarioConfig,
) -> cryocore_sim::Result<(Vec<TickResult>, RunSummary, SystemStatus)> {
    let mut controller = scenario.build_controller()?;
    controller.initialize();
    let ticks = controller.config().ticks;
    let results = controller.run(ticks, &mut TracingSink)?;
    let summary = RunSummary::from_results(&results, controller.config().dt_hours());
    controller.shutdown();
    Ok((results, summary, controller.status()))
}

fn main() {
    let cli = parse_args();
    init_tracing(cli.log_json);

    let scenario = load_scenario(&cli);

    let (results, summary, status) = run_simulation(&scenario).unwrap_or_else(|e| {
        error!(error = %e, "simulation failed");
        eprintln!("error: {e}");
        process::exit(1);
    });

    for r in &results {
        println!("{r}");
    }
    println!("\n{summary}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(cryocore_sim::api::AppState {
            status,
            summary,
            results,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(cryocore_sim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
    #[cfg(not(feature = "api"))]
    let _ = status;
}
