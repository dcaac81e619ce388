//! Physical constants, the °F conversion and the cylindrical air volume.

use serde::Serialize;

use crate::error::{CryoError, Result};

/// Absolute zero in degrees Celsius.
pub const ABSOLUTE_ZERO_C: f64 = -273.15;

/// Meters per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Air density at sea level used by the cooling model (kg/m³).
pub const AIR_DENSITY_KG_PER_M3: f64 = 1.2;

/// Specific heat capacity of air (J/(kg·°C)).
pub const AIR_SPECIFIC_HEAT_J_PER_KG_C: f64 = 1005.0;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Energy in joules delivered by `watts` over `seconds`.
pub fn heat_energy_j(watts: f64, seconds: f64) -> f64 {
    watts * seconds
}

/// Cylindrical column of air around the installation.
///
/// Built once from configuration (feet) and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AirVolume {
    radius_ft: f64,
    height_ft: f64,
    volume_m3: f64,
}

impl AirVolume {
    /// Builds the cylinder from radius and height in feet.
    ///
    /// # Errors
    ///
    /// Returns [`CryoError::InvalidGeometry`] if either dimension is not a
    /// positive finite number.
    pub fn from_feet(radius_ft: f64, height_ft: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(radius_ft) || !valid(height_ft) {
            return Err(CryoError::InvalidGeometry {
                radius_ft,
                height_ft,
            });
        }

        let radius_m = radius_ft * METERS_PER_FOOT;
        let height_m = height_ft * METERS_PER_FOOT;
        Ok(Self {
            radius_ft,
            height_ft,
            volume_m3: std::f64::consts::PI * radius_m * radius_m * height_m,
        })
    }

    pub fn radius_ft(&self) -> f64 {
        self.radius_ft
    }

    pub fn height_ft(&self) -> f64 {
        self.height_ft
    }

    /// Volume in cubic meters.
    pub fn volume_m3(&self) -> f64 {
        self.volume_m3
    }

    /// Mass of the enclosed air (kg).
    pub fn air_mass_kg(&self) -> f64 {
        self.volume_m3 * AIR_DENSITY_KG_PER_M3
    }
}
