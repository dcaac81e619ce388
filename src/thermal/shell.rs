//! Insulated metal enclosure around a cooling core.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CryoError, Result};

/// Enclosure material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellMaterial {
    #[default]
    StainlessSteel,
    Aluminum,
    Copper,
}

impl ShellMaterial {
    /// Approximate thermal conductivity (W/(m·K)).
    pub fn conductivity(self) -> f64 {
        match self {
            Self::StainlessSteel => 16.0,
            Self::Aluminum => 205.0,
            Self::Copper => 385.0,
        }
    }
}

/// Cylindrical shell approximated as a flat plate for steady-state
/// conduction: `Q = k · A · ΔT / d`.
///
/// The cylinder is taken to be 1 m tall; its radius follows from the
/// internal volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureShell {
    material: ShellMaterial,
    thickness_mm: f64,
    volume_liters: f64,
}

impl StructureShell {
    /// # Errors
    ///
    /// Returns [`CryoError::InvalidParameter`] for non-positive thickness or
    /// volume.
    pub fn new(material: ShellMaterial, thickness_mm: f64, volume_liters: f64) -> Result<Self> {
        if !(thickness_mm.is_finite() && thickness_mm > 0.0) {
            return Err(CryoError::InvalidParameter {
                name: "thickness_mm",
                reason: format!("must be > 0, got {thickness_mm}"),
            });
        }
        if !(volume_liters.is_finite() && volume_liters > 0.0) {
            return Err(CryoError::InvalidParameter {
                name: "volume_liters",
                reason: format!("must be > 0, got {volume_liters}"),
            });
        }
        Ok(Self {
            material,
            thickness_mm,
            volume_liters,
        })
    }

    pub fn material(&self) -> ShellMaterial {
        self.material
    }

    /// Lateral plus end-cap area (m²).
    pub fn surface_area_m2(&self) -> f64 {
        use std::f64::consts::PI;
        let radius_m = (3.0 * self.volume_liters / 1000.0 / PI).sqrt();
        2.0 * PI * radius_m + 2.0 * PI * radius_m * radius_m
    }

    /// Heat flow through the shell (W) for a temperature difference across it.
    pub fn heat_transfer_rate(&self, delta_temp_c: f64) -> f64 {
        let thickness_m = self.thickness_mm / 1000.0;
        self.material.conductivity() * self.surface_area_m2() * delta_temp_c / thickness_m
    }
}

impl Default for StructureShell {
    fn default() -> Self {
        Self {
            material: ShellMaterial::StainlessSteel,
            thickness_mm: 2.0,
            volume_liters: 3.0,
        }
    }
}

impl fmt::Display for StructureShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StructureShell({:?}, {} mm, {} L, k={} W/m·K)",
            self.material,
            self.thickness_mm,
            self.volume_liters,
            self.material.conductivity()
        )
    }
}
