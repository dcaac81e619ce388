//! Energy balance between applied power and the temperature of an air mass.

use crate::error::{CryoError, Result};

use super::units::{AIR_SPECIFIC_HEAT_J_PER_KG_C, AirVolume, heat_energy_j};

/// Default share of applied electrical power that ends up as cooling.
pub const DEFAULT_EFFICIENCY: f64 = 0.68;

/// Converts applied wattage over a duration into a temperature delta for a
/// fixed air volume, and back for passive heat gain.
///
/// `ΔT = E / (m · c)` with `m = volume · 1.2 kg/m³` and `c = 1005 J/(kg·°C)`.
/// Both directions are pure functions: negative power yields a negative
/// result and callers decide whether that is acceptable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingModel {
    air_volume_m3: f64,
    air_mass_kg: f64,
    efficiency: f64,
}

impl CoolingModel {
    /// Creates a model for `volume` with the given conversion efficiency.
    ///
    /// # Errors
    ///
    /// Returns [`CryoError::InvalidParameter`] if `efficiency` is outside
    /// `[0.0, 1.0]`.
    pub fn new(volume: &AirVolume, efficiency: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&efficiency) {
            return Err(CryoError::InvalidParameter {
                name: "system_efficiency",
                reason: format!("must be in [0.0, 1.0], got {efficiency}"),
            });
        }
        Ok(Self {
            air_volume_m3: volume.volume_m3(),
            air_mass_kg: volume.air_mass_kg(),
            efficiency,
        })
    }

    pub fn air_volume_m3(&self) -> f64 {
        self.air_volume_m3
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    fn heat_capacity_j_per_c(&self) -> f64 {
        self.air_mass_kg * AIR_SPECIFIC_HEAT_J_PER_KG_C
    }

    /// Temperature drop (°C) from `watts` of cooling applied for `seconds`.
    pub fn compute_temp_drop(&self, watts: f64, seconds: f64) -> f64 {
        heat_energy_j(watts, seconds) * self.efficiency / self.heat_capacity_j_per_c()
    }

    /// Temperature rise (°C) from `watts` of ambient gain over `seconds`,
    /// scaled by `sunlight_factor` (0.0 night, 1.0 midday).
    pub fn inverse_temp_gain(&self, watts: f64, seconds: f64, sunlight_factor: f64) -> f64 {
        heat_energy_j(watts, seconds) * sunlight_factor / self.heat_capacity_j_per_c()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(efficiency: f64) -> CoolingModel {
        let volume = AirVolume::from_feet(9.0, 20.0).expect("valid geometry");
        CoolingModel::new(&volume, efficiency).expect("valid efficiency")
    }

    #[test]
    fn one_hour_at_135_watts() {
        let m = model(0.68);
        let drop = m.compute_temp_drop(135.0, 3600.0);
        // 135 * 3600 * 0.68 / (144.1 * 1.2 * 1005)
        assert!((drop - 1.9015).abs() < 1e-3, "got {drop}");
        assert!((drop - 1.88).abs() < 0.05);
    }

    #[test]
    fn drop_non_negative_and_monotonic() {
        let m = model(DEFAULT_EFFICIENCY);
        let mut last = 0.0;
        for w in [0.0, 1.0, 10.0, 100.0, 1000.0] {
            let d = m.compute_temp_drop(w, 60.0);
            assert!(d >= 0.0);
            assert!(d >= last);
            last = d;
        }
        let mut last = 0.0;
        for s in [0.0, 1.0, 60.0, 3600.0] {
            let d = m.compute_temp_drop(50.0, s);
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn negative_power_yields_negative_drop() {
        assert!(model(0.5).compute_temp_drop(-10.0, 10.0) < 0.0);
    }

    #[test]
    fn gain_matches_drop_when_factors_agree() {
        let m = model(0.42);
        let drop = m.compute_temp_drop(300.0, 120.0);
        let gain = m.inverse_temp_gain(300.0, 120.0, 0.42);
        assert!((drop - gain).abs() < 1e-12);
    }

    #[test]
    fn efficiency_out_of_range_rejected() {
        let volume = AirVolume::from_feet(1.0, 1.0).expect("valid geometry");
        assert!(CoolingModel::new(&volume, 1.2).is_err());
        assert!(CoolingModel::new(&volume, -0.1).is_err());
    }
}
