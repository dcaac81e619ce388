//! Outdoor air column cooled by the cluster and reheated by ambient gain.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::{CryoError, Result, check_duration};

use super::cooling_model::CoolingModel;
use super::memory::ThermalMemory;
use super::shell::StructureShell;
use super::units::{ABSOLUTE_ZERO_C, AirVolume, celsius_to_fahrenheit};

/// Default passive ambient/solar gain driving reheat (W).
pub const DEFAULT_PASSIVE_GAIN_WATTS: f64 = 300.0;

/// Construction parameters for an [`Environment`].
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentParams {
    pub ambient_temp_c: f64,
    pub radius_ft: f64,
    pub height_ft: f64,
    pub memory_half_life_sec: f64,
    pub system_efficiency: f64,
    pub passive_gain_watts: f64,
    /// Enclosure conducting outside heat back in during recovery.
    pub shell: Option<StructureShell>,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            ambient_temp_c: 45.0,
            radius_ft: 9.0,
            height_ft: 20.0,
            memory_half_life_sec: 300.0,
            system_efficiency: super::cooling_model::DEFAULT_EFFICIENCY,
            passive_gain_watts: DEFAULT_PASSIVE_GAIN_WATTS,
            shell: None,
        }
    }
}

/// Read-only projection of the environment for status consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentReport {
    pub ambient_temp_start_c: f64,
    /// Rounded to two decimals.
    pub current_temp_c: f64,
    /// Rounded to two decimals.
    pub current_temp_f: f64,
    pub radius_ft: f64,
    pub height_ft: f64,
    /// Rounded to two decimals.
    pub air_volume_m3: f64,
    /// Seconds since the Unix epoch of the last mutation, if any.
    pub last_update: Option<f64>,
}

/// Ambient air state affected by the installation.
///
/// `current_temp_c` stays within `[ABSOLUTE_ZERO_C, ceiling]`, where the
/// ceiling is the initial ambient temperature unless a recovery call names
/// another one. Only [`apply_cooling`](Self::apply_cooling) and
/// [`recover_heat`](Self::recover_heat) mutate it.
#[derive(Debug, Clone)]
pub struct Environment {
    ambient_initial_c: f64,
    current_temp_c: f64,
    air_volume: AirVolume,
    model: CoolingModel,
    memory: ThermalMemory,
    passive_gain_watts: f64,
    shell: Option<StructureShell>,
    last_update: Option<SystemTime>,
}

impl Environment {
    /// # Errors
    ///
    /// Rejects invalid geometry, efficiency, half-life, a non-finite ambient
    /// temperature below absolute zero, or a negative passive gain.
    pub fn new(params: EnvironmentParams) -> Result<Self> {
        if !params.ambient_temp_c.is_finite() || params.ambient_temp_c < ABSOLUTE_ZERO_C {
            return Err(CryoError::InvalidParameter {
                name: "ambient_temp_c",
                reason: format!("must be >= {ABSOLUTE_ZERO_C}, got {}", params.ambient_temp_c),
            });
        }
        if !params.passive_gain_watts.is_finite() || params.passive_gain_watts < 0.0 {
            return Err(CryoError::InvalidParameter {
                name: "passive_gain_watts",
                reason: format!("must be >= 0, got {}", params.passive_gain_watts),
            });
        }

        let air_volume = AirVolume::from_feet(params.radius_ft, params.height_ft)?;
        let model = CoolingModel::new(&air_volume, params.system_efficiency)?;
        let memory = ThermalMemory::new(params.memory_half_life_sec)?;

        Ok(Self {
            ambient_initial_c: params.ambient_temp_c,
            current_temp_c: params.ambient_temp_c,
            air_volume,
            model,
            memory,
            passive_gain_watts: params.passive_gain_watts,
            shell: params.shell,
            last_update: None,
        })
    }

    pub fn current_temp_c(&self) -> f64 {
        self.current_temp_c
    }

    pub fn ambient_initial_c(&self) -> f64 {
        self.ambient_initial_c
    }

    pub fn air_volume(&self) -> &AirVolume {
        &self.air_volume
    }

    pub fn model(&self) -> &CoolingModel {
        &self.model
    }

    pub fn memory(&self) -> &ThermalMemory {
        &self.memory
    }

    pub fn shell(&self) -> Option<&StructureShell> {
        self.shell.as_ref()
    }

    /// Heat conducted through the shell (W) from air at `outside_c`.
    /// Zero without a shell or when the column is not colder.
    pub fn shell_gain_watts(&self, outside_c: f64) -> f64 {
        self.shell.map_or(0.0, |shell| {
            shell
                .heat_transfer_rate(outside_c - self.current_temp_c)
                .max(0.0)
        })
    }

    /// Residual-cooling estimate relative to the initial ambient temperature.
    pub fn estimated_temp_c(&self) -> f64 {
        self.memory.estimate(self.ambient_initial_c)
    }

    /// Lowers the air temperature by the drop produced by `watts` over
    /// `seconds` and records the result in thermal memory.
    ///
    /// Negative power is treated as zero so the temperature never rises here.
    /// Returns the applied drop (°C) after clamping at absolute zero.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidDuration`] for non-positive `seconds`; state is
    /// left untouched.
    pub fn apply_cooling(&mut self, watts: f64, seconds: f64) -> Result<f64> {
        let seconds = check_duration(seconds)?;
        let drop = self.model.compute_temp_drop(watts.max(0.0), seconds);

        let before = self.current_temp_c;
        self.current_temp_c = (before - drop).max(ABSOLUTE_ZERO_C);
        self.memory.record(self.current_temp_c);
        self.last_update = Some(SystemTime::now());

        Ok(before - self.current_temp_c)
    }

    /// Raises the air temperature over `seconds` by the configured passive
    /// gain plus any shell conduction, clamped at `ambient_override` or the
    /// initial ambient temperature. Returns the applied rise (°C).
    ///
    /// A temperature already above the ceiling is left where it is.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidDuration`] for non-positive `seconds`.
    pub fn recover_heat(&mut self, seconds: f64, ambient_override: Option<f64>) -> Result<f64> {
        let seconds = check_duration(seconds)?;
        let ceiling = ambient_override.unwrap_or(self.ambient_initial_c);
        let gain_watts = self.passive_gain_watts + self.shell_gain_watts(ceiling);
        let gain = self.model.inverse_temp_gain(gain_watts, seconds, 1.0);

        let before = self.current_temp_c;
        let raised = (before + gain).min(ceiling);
        self.current_temp_c = raised.max(before);
        self.last_update = Some(SystemTime::now());

        Ok(self.current_temp_c - before)
    }

    /// Read-only snapshot, no side effects.
    pub fn report(&self) -> EnvironmentReport {
        EnvironmentReport {
            ambient_temp_start_c: self.ambient_initial_c,
            current_temp_c: round2(self.current_temp_c),
            current_temp_f: round2(celsius_to_fahrenheit(self.current_temp_c)),
            radius_ft: self.air_volume.radius_ft(),
            height_ft: self.air_volume.height_ft(),
            air_volume_m3: round2(self.air_volume.volume_m3()),
            last_update: self
                .last_update
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs_f64()),
        }
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
