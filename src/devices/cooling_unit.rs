use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, check_duration};

use super::fan::{DEFAULT_FAN_AIRFLOW_CFM, DEFAULT_FAN_MAX_RPM, FanEmitter, FanStatus};

/// Electrical characteristics shared by every unit in a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitSpec {
    /// Minimum input power for the unit to start (W).
    pub min_operating_watts: f64,
    /// Fraction of input power converted to cooling capacity.
    pub conversion_efficiency: f64,
    /// Largest drop below ambient the unit can reach (°C).
    pub max_cooling_delta_c: f64,
    /// Internal cooling rate per watt of capacity (°C/s per W).
    pub cooling_rate_per_watt: f64,
    /// Top speed of the unit's dispersion fan.
    pub fan_max_rpm: u32,
    /// Rated airflow of the unit's dispersion fan (ft³/min).
    pub fan_airflow_cfm: f64,
}

impl Default for UnitSpec {
    fn default() -> Self {
        Self {
            min_operating_watts: 5.0,
            conversion_efficiency: 0.15,
            max_cooling_delta_c: 25.0,
            cooling_rate_per_watt: 0.2 / 1000.0,
            fan_max_rpm: DEFAULT_FAN_MAX_RPM,
            fan_airflow_cfm: DEFAULT_FAN_AIRFLOW_CFM,
        }
    }
}

/// Lifecycle of a cooling unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Uninitialized,
    Operational,
    Inactive,
}

/// Point-in-time view of one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitStatus {
    pub unit_id: String,
    pub operational: bool,
    pub state: UnitState,
    pub rated_input_watts: f64,
    pub cooling_capacity_watts: f64,
    pub internal_temp_c: f64,
    pub fan: FanStatus,
}

/// A single thermoelectric cooling element with a fixed power allocation.
///
/// `Uninitialized -> startup -> Operational | Inactive`, and
/// `Operational -> shutdown -> Inactive`. An inactive unit can be started
/// again. `internal_temp_c` never drops below `ambient - max_cooling_delta`.
/// The dispersion fan runs exactly while the unit is operational.
#[derive(Debug, Clone)]
pub struct CoolingUnit {
    id: String,
    rated_input_watts: f64,
    ambient_temp_c: f64,
    spec: UnitSpec,
    state: UnitState,
    cooling_capacity_watts: f64,
    internal_temp_c: f64,
    fan: FanEmitter,
}

impl CoolingUnit {
    /// Creates an uninitialized unit at ambient temperature. A negative
    /// allocation is treated as zero.
    pub fn new(
        id: impl Into<String>,
        rated_input_watts: f64,
        ambient_temp_c: f64,
        spec: UnitSpec,
    ) -> Self {
        Self {
            id: id.into(),
            rated_input_watts: rated_input_watts.max(0.0),
            ambient_temp_c,
            spec,
            state: UnitState::Uninitialized,
            cooling_capacity_watts: 0.0,
            internal_temp_c: ambient_temp_c,
            fan: FanEmitter::new(spec.fan_max_rpm, spec.fan_airflow_cfm),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn is_operational(&self) -> bool {
        self.state == UnitState::Operational
    }

    pub fn rated_input_watts(&self) -> f64 {
        self.rated_input_watts
    }

    pub fn cooling_capacity_watts(&self) -> f64 {
        self.cooling_capacity_watts
    }

    pub fn internal_temp_c(&self) -> f64 {
        self.internal_temp_c
    }

    pub fn fan(&self) -> &FanEmitter {
        &self.fan
    }

    /// Lowest internal temperature the unit can reach.
    pub fn floor_temp_c(&self) -> f64 {
        self.ambient_temp_c - self.spec.max_cooling_delta_c
    }

    /// Starts the unit if its allocation meets the operating threshold.
    ///
    /// Insufficient power leaves the unit `Inactive` with zero capacity and
    /// returns `false`; it is not an error.
    pub fn startup(&mut self) -> bool {
        if self.rated_input_watts >= self.spec.min_operating_watts {
            self.cooling_capacity_watts = self.rated_input_watts * self.spec.conversion_efficiency;
            self.state = UnitState::Operational;
            self.fan.activate();
            debug!(
                unit = %self.id,
                capacity_w = self.cooling_capacity_watts,
                "cooling unit started"
            );
            true
        } else {
            self.cooling_capacity_watts = 0.0;
            self.state = UnitState::Inactive;
            self.fan.shutdown();
            warn!(
                unit = %self.id,
                input_w = self.rated_input_watts,
                required_w = self.spec.min_operating_watts,
                "insufficient power to start cooling unit"
            );
            false
        }
    }

    /// Cools the unit interior for `seconds` of simulated time.
    ///
    /// No-op unless operational. The temperature falls at a rate set by the
    /// cooling capacity and stops exactly at the floor. Returns the drop
    /// applied (°C).
    ///
    /// # Errors
    ///
    /// [`crate::error::CryoError::InvalidDuration`] for non-positive `seconds`.
    pub fn cool(&mut self, seconds: f64) -> Result<f64> {
        let seconds = check_duration(seconds)?;
        if !self.is_operational() {
            return Ok(0.0);
        }
        let rate = self.cooling_capacity_watts * self.spec.cooling_rate_per_watt;
        let before = self.internal_temp_c;
        self.internal_temp_c = (before - rate * seconds).max(self.floor_temp_c()).min(before);
        Ok(before - self.internal_temp_c)
    }

    /// Stops the unit and clears its output. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == UnitState::Operational {
            debug!(unit = %self.id, "cooling unit shut down");
        }
        self.state = UnitState::Inactive;
        self.cooling_capacity_watts = 0.0;
        self.fan.shutdown();
    }

    pub fn status(&self) -> UnitStatus {
        UnitStatus {
            unit_id: self.id.clone(),
            operational: self.is_operational(),
            state: self.state,
            rated_input_watts: self.rated_input_watts,
            cooling_capacity_watts: self.cooling_capacity_watts,
            internal_temp_c: self.internal_temp_c,
            fan: self.fan.status(),
        }
    }
}
