//! Shared test fixtures for integration tests.

use cryocore_sim::config::ScenarioConfig;
use cryocore_sim::devices::{PowerSource, SourceType};
use cryocore_sim::reporting::NullSink;
use cryocore_sim::sim::controller::{Controller, ControllerParams};
use cryocore_sim::sim::kpi::RunSummary;
use cryocore_sim::sim::types::{SimConfig, TickResult};

/// Default run timing (60 ticks of 10 s from noon, seed 42).
pub fn default_config() -> SimConfig {
    SimConfig::new(60, 10.0, 12.0, 42).expect("valid sim config")
}

/// Canonical installation parameters (9 units, 360 W, 45 C column).
pub fn default_params() -> ControllerParams {
    ControllerParams::default()
}

/// Initialized controller over a simulated source of the given kind.
pub fn initialized_controller(
    source_type: SourceType,
    max_output_watts: f64,
    params: ControllerParams,
) -> Controller<PowerSource> {
    let source = PowerSource::new(source_type, max_output_watts).expect("valid source");
    let mut controller =
        Controller::new(default_config(), params, source).expect("valid controller");
    controller.initialize();
    controller
}

/// Runs a built-in preset to completion.
///
/// Returns `(results, summary)`.
pub fn run_preset(name: &str) -> (Vec<TickResult>, RunSummary) {
    let scenario = ScenarioConfig::from_preset(name).expect("known preset");
    let mut controller = scenario.build_controller().expect("valid controller");
    controller.initialize();
    let results = controller
        .run(scenario.simulation.ticks, &mut NullSink)
        .expect("run completes");
    let summary = RunSummary::from_results(&results, controller.config().dt_hours());
    (results, summary)
}
