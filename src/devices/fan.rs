use serde::Serialize;
use tracing::debug;

/// Default top speed of a unit fan.
pub const DEFAULT_FAN_MAX_RPM: u32 = 3000;
/// Default rated airflow of a unit fan (ft³/min).
pub const DEFAULT_FAN_AIRFLOW_CFM: f64 = 150.0;

/// Point-in-time view of a fan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanStatus {
    pub active: bool,
    pub current_rpm: u32,
    pub max_rpm: u32,
    pub airflow_cfm: f64,
}

/// Fan emitter dispersing cooled air in a 360° pattern.
///
/// Runs at full speed while active and stands still otherwise; it has no
/// partial-speed mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FanEmitter {
    max_rpm: u32,
    airflow_cfm: f64,
    current_rpm: u32,
    active: bool,
}

impl FanEmitter {
    /// Creates a stopped fan. A negative or non-finite airflow is treated
    /// as zero.
    pub fn new(max_rpm: u32, airflow_cfm: f64) -> Self {
        let airflow_cfm = if airflow_cfm.is_finite() {
            airflow_cfm.max(0.0)
        } else {
            0.0
        };
        Self {
            max_rpm,
            airflow_cfm,
            current_rpm: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_rpm(&self) -> u32 {
        self.current_rpm
    }

    pub fn max_rpm(&self) -> u32 {
        self.max_rpm
    }

    /// Rated airflow (ft³/min).
    pub fn airflow_cfm(&self) -> f64 {
        self.airflow_cfm
    }

    /// Airflow actually moved right now (ft³/min).
    pub fn delivered_airflow_cfm(&self) -> f64 {
        if self.active { self.airflow_cfm } else { 0.0 }
    }

    /// Spins the fan up to its top speed.
    pub fn activate(&mut self) {
        self.current_rpm = self.max_rpm;
        self.active = true;
        debug!(rpm = self.current_rpm, "fan emitter activated");
    }

    /// Stops the fan. Idempotent.
    pub fn shutdown(&mut self) {
        self.current_rpm = 0;
        self.active = false;
    }

    pub fn status(&self) -> FanStatus {
        FanStatus {
            active: self.active,
            current_rpm: self.current_rpm,
            max_rpm: self.max_rpm,
            airflow_cfm: self.airflow_cfm,
        }
    }
}

impl Default for FanEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_MAX_RPM, DEFAULT_FAN_AIRFLOW_CFM)
    }
}
