use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::devices::types::{DriveContext, PowerSupply};
use crate::error::{CryoError, Result};

/// Hours from solar noon at which the day curve reaches zero.
const SOLAR_HALF_WIDTH_H: f64 = 6.0;
const SOLAR_NOON_H: f64 = 12.0;

/// Kind of electrical supply feeding the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Solar,
    Piston,
    Grid,
    Battery,
}

impl SourceType {
    pub const ALL: [SourceType; 4] = [Self::Solar, Self::Piston, Self::Grid, Self::Battery];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Piston => "piston",
            Self::Grid => "grid",
            Self::Battery => "battery",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CryoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CryoError::InvalidParameter {
                name: "source_type",
                reason: format!("unknown source \"{s}\", expected solar, piston, grid or battery"),
            })
    }
}

/// A power source whose output is a stateless function of its type and the
/// driving parameter for the tick.
///
/// - `solar`: triangular day curve `max * max(0, 1 - |h - 12| / 6)`
/// - `piston`: `max * rate`, rate clamped to `[0, 1]`
/// - `grid`/`battery`: constant `max` while active (no depletion here)
///
/// A missing driving parameter yields zero output for solar and piston.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSource {
    pub source_type: SourceType,
    /// Peak output in watts.
    pub max_output_watts: f64,
    active: bool,
}

impl PowerSource {
    /// Creates an inactive source.
    ///
    /// # Errors
    ///
    /// Returns [`CryoError::InvalidPowerBudget`] if `max_output_watts` is
    /// negative or not finite.
    pub fn new(source_type: SourceType, max_output_watts: f64) -> Result<Self> {
        if !max_output_watts.is_finite() || max_output_watts < 0.0 {
            return Err(CryoError::InvalidPowerBudget(max_output_watts));
        }
        Ok(Self {
            source_type,
            max_output_watts,
            active: false,
        })
    }

    /// Output fraction of peak for the given hour on the solar day curve.
    pub fn solar_fraction(time_of_day: f64) -> f64 {
        (1.0 - (time_of_day - SOLAR_NOON_H).abs() / SOLAR_HALF_WIDTH_H).max(0.0)
    }
}

impl PowerSupply for PowerSource {
    fn current_output(&self, context: &DriveContext) -> f64 {
        if !self.active {
            return 0.0;
        }
        let fraction = match self.source_type {
            SourceType::Solar => context
                .time_of_day
                .filter(|h| h.is_finite())
                .map_or(0.0, Self::solar_fraction),
            SourceType::Piston => context
                .rate
                .filter(|r| r.is_finite())
                .map_or(0.0, |r| r.clamp(0.0, 1.0)),
            SourceType::Grid | SourceType::Battery => 1.0,
        };
        self.max_output_watts * fraction
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn supply_type(&self) -> &'static str {
        self.source_type.as_str()
    }

    fn draws_from_storage(&self) -> bool {
        self.source_type == SourceType::Battery
    }
}
