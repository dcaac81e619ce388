//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::devices::{PowerSource, SourceType, UnitSpec};
use crate::error::Result;
use crate::sim::cluster::DEFAULT_UNIT_COUNT;
use crate::sim::controller::{Controller, ControllerParams, PistonDrive};
use crate::sim::types::SimConfig;
use crate::thermal::{EnvironmentParams, ShellMaterial, StructureShell};
use crate::thermal::cooling_model::DEFAULT_EFFICIENCY;
use crate::thermal::environment::DEFAULT_PASSIVE_GAIN_WATTS;
use crate::thermal::units::ABSOLUTE_ZERO_C;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline installation. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run timing and reporting.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Cluster identity, budget and size.
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Per-unit electrical characteristics.
    #[serde(default)]
    pub unit: UnitSpec,
    /// Air column and thermal model.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Power source and battery ledger.
    #[serde(default)]
    pub power: PowerConfig,
}

/// Run timing and reporting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of ticks to run (must be > 0).
    pub ticks: usize,
    /// Simulated seconds per tick (must be > 0).
    pub cycle_seconds: f64,
    /// Hour of day at the first tick, in `[0, 24)`.
    pub start_hour: f64,
    /// Master random seed.
    pub seed: u64,
    /// Status snapshot interval in ticks (0 disables).
    pub report_every: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 360,
            cycle_seconds: 10.0,
            start_hour: 12.0,
            seed: 42,
            report_every: 60,
        }
    }
}

/// Cluster identity, budget and size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    pub cluster_id: String,
    /// Total input power shared evenly by the units (W).
    pub power_budget_watts: f64,
    pub unit_count: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_id: "cryocore".to_string(),
            power_budget_watts: 360.0,
            unit_count: DEFAULT_UNIT_COUNT,
        }
    }
}

/// Air column and thermal model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Initial and ceiling air temperature (°C).
    pub ambient_temp_c: f64,
    pub radius_ft: f64,
    pub height_ft: f64,
    /// Residual-cooling half-life (s).
    pub memory_half_life_sec: f64,
    /// Fraction of delivered power that becomes cooling (0.0–1.0).
    pub system_efficiency: f64,
    /// Passive ambient/solar gain driving reheat (W).
    pub passive_gain_watts: f64,
    /// Optional enclosure adding conduction gain during recovery.
    pub shell: Option<ShellConfig>,
}

/// Enclosure around the cooling core (`[environment.shell]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// `"stainless_steel"`, `"aluminum"` or `"copper"`.
    #[serde(default)]
    pub material: ShellMaterial,
    pub thickness_mm: f64,
    pub volume_liters: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            ambient_temp_c: 45.0,
            radius_ft: 9.0,
            height_ft: 20.0,
            memory_half_life_sec: 300.0,
            system_efficiency: DEFAULT_EFFICIENCY,
            passive_gain_watts: DEFAULT_PASSIVE_GAIN_WATTS,
            shell: None,
        }
    }
}

/// Power source and battery ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerConfig {
    /// `"solar"`, `"piston"`, `"grid"` or `"battery"`.
    pub source_type: SourceType,
    /// Peak source output (W).
    pub max_output_watts: f64,
    /// Fixed kinetic impulse rate (0.0–1.0), used unless `piston_random`.
    pub piston_rate: f64,
    /// Draw a seeded random impulse each tick instead of `piston_rate`.
    pub piston_random: bool,
    /// Battery ledger capacity (Wh).
    pub battery_capacity_wh: f64,
    /// Battery ledger starting level (Wh).
    pub battery_initial_wh: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            source_type: SourceType::Grid,
            max_output_watts: 360.0,
            piston_rate: 1.0,
            piston_random: false,
            battery_capacity_wh: 200.0,
            battery_initial_wh: 100.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the canonical grid-fed installation.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the solar-day preset: one simulated day on a sized-up array.
    pub fn solar_day() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 144,
                cycle_seconds: 600.0,
                start_hour: 0.0,
                report_every: 12,
                ..SimulationConfig::default()
            },
            cluster: ClusterConfig {
                power_budget_watts: 1200.0,
                ..ClusterConfig::default()
            },
            power: PowerConfig {
                source_type: SourceType::Solar,
                max_output_watts: 1200.0,
                battery_capacity_wh: 2000.0,
                battery_initial_wh: 0.0,
                ..PowerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the piston-field preset: random kinetic impulses on a tight
    /// budget, so low-impulse ticks fall short.
    pub fn piston_field() -> Self {
        Self {
            cluster: ClusterConfig {
                power_budget_watts: 90.0,
                ..ClusterConfig::default()
            },
            power: PowerConfig {
                source_type: SourceType::Piston,
                max_output_watts: 90.0,
                piston_random: true,
                ..PowerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the battery-night preset: a small battery drained at full
    /// budget until the cluster runs short.
    pub fn battery_night() -> Self {
        Self {
            simulation: SimulationConfig {
                ticks: 120,
                cycle_seconds: 30.0,
                start_hour: 20.0,
                report_every: 20,
                ..SimulationConfig::default()
            },
            cluster: ClusterConfig {
                power_budget_watts: 720.0,
                ..ClusterConfig::default()
            },
            power: PowerConfig {
                source_type: SourceType::Battery,
                max_output_watts: 720.0,
                battery_capacity_wh: 60.0,
                battery_initial_wh: 60.0,
                ..PowerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "solar_day", "piston_field", "battery_night"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "solar_day" => Ok(Self::solar_day()),
            "piston_field" => Ok(Self::piston_field()),
            "battery_night" => Ok(Self::battery_night()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError::new(field, message));
            }
        };

        let s = &self.simulation;
        check(s.ticks > 0, "simulation.ticks", "must be > 0");
        check(positive(s.cycle_seconds), "simulation.cycle_seconds", "must be > 0");
        check((0.0..24.0).contains(&s.start_hour), "simulation.start_hour", "must be in [0, 24)");

        let c = &self.cluster;
        check(!c.cluster_id.trim().is_empty(), "cluster.cluster_id", "must not be empty");
        check(non_negative(c.power_budget_watts), "cluster.power_budget_watts", "must be >= 0");
        check(c.unit_count > 0, "cluster.unit_count", "must be > 0");

        let u = &self.unit;
        check(non_negative(u.min_operating_watts), "unit.min_operating_watts", "must be >= 0");
        check(
            fraction(u.conversion_efficiency),
            "unit.conversion_efficiency",
            "must be in [0.0, 1.0]",
        );
        check(non_negative(u.max_cooling_delta_c), "unit.max_cooling_delta_c", "must be >= 0");
        check(non_negative(u.cooling_rate_per_watt), "unit.cooling_rate_per_watt", "must be >= 0");
        check(non_negative(u.fan_airflow_cfm), "unit.fan_airflow_cfm", "must be >= 0");

        let e = &self.environment;
        check(
            e.ambient_temp_c.is_finite() && e.ambient_temp_c >= ABSOLUTE_ZERO_C,
            "environment.ambient_temp_c",
            "must be >= -273.15",
        );
        check(positive(e.radius_ft), "environment.radius_ft", "must be > 0");
        check(positive(e.height_ft), "environment.height_ft", "must be > 0");
        check(
            positive(e.memory_half_life_sec)
                && Duration::try_from_secs_f64(e.memory_half_life_sec).is_ok(),
            "environment.memory_half_life_sec",
            "must be > 0 and fit in a duration",
        );
        check(
            fraction(e.system_efficiency),
            "environment.system_efficiency",
            "must be in [0.0, 1.0]",
        );
        check(non_negative(e.passive_gain_watts), "environment.passive_gain_watts", "must be >= 0");
        if let Some(shell) = &e.shell {
            check(positive(shell.thickness_mm), "environment.shell.thickness_mm", "must be > 0");
            check(positive(shell.volume_liters), "environment.shell.volume_liters", "must be > 0");
        }

        let p = &self.power;
        check(non_negative(p.max_output_watts), "power.max_output_watts", "must be >= 0");
        check(fraction(p.piston_rate), "power.piston_rate", "must be in [0.0, 1.0]");
        check(non_negative(p.battery_capacity_wh), "power.battery_capacity_wh", "must be >= 0");
        check(
            non_negative(p.battery_initial_wh) && p.battery_initial_wh <= p.battery_capacity_wh,
            "power.battery_initial_wh",
            "must be in [0, power.battery_capacity_wh]",
        );

        errors
    }

    /// Run timing for this scenario.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidDuration`](crate::error::CryoError::InvalidDuration)
    /// for a non-positive cycle length.
    pub fn sim_config(&self) -> Result<SimConfig> {
        let s = &self.simulation;
        let mut config = SimConfig::new(s.ticks, s.cycle_seconds, s.start_hour, s.seed)?;
        config.report_every = s.report_every;
        Ok(config)
    }

    /// Installation parameters for the controller.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidParameter`](crate::error::CryoError::InvalidParameter)
    /// for shell dimensions that are not positive.
    pub fn controller_params(&self) -> Result<ControllerParams> {
        let e = &self.environment;
        let p = &self.power;
        let shell = e
            .shell
            .as_ref()
            .map(|s| StructureShell::new(s.material, s.thickness_mm, s.volume_liters))
            .transpose()?;
        Ok(ControllerParams {
            cluster_id: self.cluster.cluster_id.clone(),
            power_budget_watts: self.cluster.power_budget_watts,
            unit_count: self.cluster.unit_count,
            unit_spec: self.unit,
            environment: EnvironmentParams {
                ambient_temp_c: e.ambient_temp_c,
                radius_ft: e.radius_ft,
                height_ft: e.height_ft,
                memory_half_life_sec: e.memory_half_life_sec,
                system_efficiency: e.system_efficiency,
                passive_gain_watts: e.passive_gain_watts,
                shell,
            },
            piston: if p.piston_random {
                PistonDrive::Random
            } else {
                PistonDrive::Fixed(p.piston_rate)
            },
            battery_capacity_wh: p.battery_capacity_wh,
            battery_initial_wh: p.battery_initial_wh,
        })
    }

    /// Builds an uninitialized controller over a simulated power source.
    ///
    /// # Errors
    ///
    /// Propagates component construction failures.
    pub fn build_controller(&self) -> Result<Controller<PowerSource>> {
        let source = PowerSource::new(self.power.source_type, self.power.max_output_watts)?;
        Controller::new(self.sim_config()?, self.controller_params()?, source)
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn fraction(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}
