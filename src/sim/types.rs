//! Core simulation types: run configuration, per-tick records and status.

use std::fmt;

use serde::Serialize;

use crate::error::{CryoError, Result};
use crate::thermal::EnvironmentReport;

use super::cluster::ClusterStatus;
use super::ledger::BatteryStatus;

/// Run timing shared by the controller and its clock.
///
/// # Examples
///
/// ```
/// use cryocore_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(6, 600.0, 12.0, 42).unwrap();
/// assert_eq!(cfg.dt_hours(), 600.0 / 3600.0);
/// assert_eq!(cfg.total_seconds(), 3600.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Number of ticks to simulate.
    pub ticks: usize,
    /// Simulated duration of one tick in seconds.
    pub cycle_seconds: f64,
    /// Hour of day at the first tick.
    pub start_hour: f64,
    /// Master random seed for reproducibility.
    pub seed: u64,
    /// Publish a status snapshot every this many ticks (0 disables).
    pub report_every: usize,
}

impl SimConfig {
    /// Creates a run configuration reporting every tick.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidDuration`] if `cycle_seconds` is not positive.
    pub fn new(ticks: usize, cycle_seconds: f64, start_hour: f64, seed: u64) -> Result<Self> {
        if !(cycle_seconds.is_finite() && cycle_seconds > 0.0) {
            return Err(CryoError::InvalidDuration(cycle_seconds));
        }
        Ok(Self {
            ticks,
            cycle_seconds,
            start_hour,
            seed,
            report_every: 1,
        })
    }

    /// Duration of one tick in hours.
    pub fn dt_hours(&self) -> f64 {
        self.cycle_seconds / 3600.0
    }

    /// Total simulated seconds across all ticks.
    pub fn total_seconds(&self) -> f64 {
        self.ticks as f64 * self.cycle_seconds
    }
}

/// Complete record of one simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickResult {
    /// Tick index.
    pub tick: usize,
    /// Simulated seconds elapsed at the end of this tick.
    pub time_s: f64,
    /// Hour of day at the start of this tick.
    pub time_of_day: f64,
    /// Kinetic impulse rate offered to the source this tick.
    pub drive_rate: f64,
    /// Raw source output before budget and ledger limits (W).
    pub source_watts: f64,
    /// Power delivered to the cluster (W).
    pub delivered_watts: f64,
    /// Surplus stored in the battery ledger (W).
    pub stored_watts: f64,
    /// Whether the cluster ran a cooling cycle this tick.
    pub cooled: bool,
    /// Whether supply fell below the cluster's operating threshold.
    pub power_shortfall: bool,
    /// Drop applied by active cooling (°C).
    pub temp_drop_c: f64,
    /// Rise applied by passive reheat (°C).
    pub temp_gain_c: f64,
    /// Air temperature at the end of the tick (°C).
    pub env_temp_c: f64,
    /// Mean internal temperature of the units (°C).
    pub mean_unit_temp_c: f64,
    /// Stored battery energy after the tick (Wh).
    pub battery_level_wh: f64,
}

impl fmt::Display for TickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>5.2}h) | src={:>7.2} W  del={:>7.2} W  store={:>6.2} W | \
             drop={:.3}  gain={:.3}  env={:>6.2} C  units={:>6.2} C | bat={:.1} Wh cooled={}",
            self.tick,
            self.time_of_day,
            self.source_watts,
            self.delivered_watts,
            self.stored_watts,
            self.temp_drop_c,
            self.temp_gain_c,
            self.env_temp_c,
            self.mean_unit_temp_c,
            self.battery_level_wh,
            self.cooled,
        )
    }
}

/// Status object polled by display and dashboard layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub cluster_id: String,
    pub operational: bool,
    /// Current air temperature, rounded to two decimals (°C).
    pub ambient_temp_c: f64,
    /// Residual-cooling estimate from thermal memory (°C).
    pub estimated_temp_c: f64,
    /// Ticks completed so far.
    pub ticks_completed: usize,
    pub source_type: &'static str,
    pub environment: EnvironmentReport,
    pub cluster_status: ClusterStatus,
    pub battery_status: BatteryStatus,
}
