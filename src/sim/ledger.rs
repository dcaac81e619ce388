use serde::Serialize;

use crate::error::{CryoError, Result};

/// Snapshot of the battery ledger for status consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryStatus {
    pub battery_capacity_wh: f64,
    pub battery_level_wh: f64,
    /// Fraction of capacity stored (0.0 to 1.0).
    pub state_of_charge: f64,
    pub operational: bool,
}

/// Energy accounting for the installation's battery buffer.
///
/// Tracks stored energy only; the battery's power limits are those of the
/// power source that represents it.
#[derive(Debug, Clone)]
pub struct PowerLedger {
    /// Usable capacity in watt-hours.
    pub capacity_wh: f64,
    level_wh: f64,
    operational: bool,
}

impl PowerLedger {
    /// Creates a ledger holding `initial_wh` (clamped to capacity).
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidParameter`] for a negative capacity or initial
    /// level.
    pub fn new(capacity_wh: f64, initial_wh: f64) -> Result<Self> {
        if !capacity_wh.is_finite() || capacity_wh < 0.0 {
            return Err(CryoError::InvalidParameter {
                name: "battery_capacity_wh",
                reason: format!("must be >= 0, got {capacity_wh}"),
            });
        }
        if !initial_wh.is_finite() || initial_wh < 0.0 {
            return Err(CryoError::InvalidParameter {
                name: "battery_initial_wh",
                reason: format!("must be >= 0, got {initial_wh}"),
            });
        }
        Ok(Self {
            capacity_wh,
            level_wh: initial_wh.min(capacity_wh),
            operational: false,
        })
    }

    pub fn level_wh(&self) -> f64 {
        self.level_wh
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn power_on(&mut self) {
        self.operational = true;
    }

    pub fn power_off(&mut self) {
        self.operational = false;
    }

    /// Largest constant draw (W) the stored energy can sustain for `hours`.
    /// Zero while offline.
    pub fn max_draw_watts(&self, hours: f64) -> f64 {
        if !self.operational || hours <= 0.0 {
            return 0.0;
        }
        self.level_wh / hours
    }

    /// Removes the energy for `watts` over `hours`, limited by what is
    /// stored. Returns the watts actually delivered; `0.0` while offline.
    pub fn draw(&mut self, watts: f64, hours: f64) -> f64 {
        if !self.operational || hours <= 0.0 {
            return 0.0;
        }
        let delivered = watts.max(0.0).min(self.max_draw_watts(hours));
        self.level_wh = (self.level_wh - delivered * hours).max(0.0);
        delivered
    }

    /// Stores the energy for `watts` over `hours`, capped at capacity.
    /// Returns the watts actually absorbed; `0.0` while offline.
    pub fn charge(&mut self, watts: f64, hours: f64) -> f64 {
        if !self.operational || hours <= 0.0 {
            return 0.0;
        }
        let headroom_w = (self.capacity_wh - self.level_wh) / hours;
        let absorbed = watts.max(0.0).min(headroom_w.max(0.0));
        self.level_wh = (self.level_wh + absorbed * hours).min(self.capacity_wh);
        absorbed
    }

    pub fn status(&self) -> BatteryStatus {
        BatteryStatus {
            battery_capacity_wh: self.capacity_wh,
            battery_level_wh: self.level_wh,
            state_of_charge: if self.capacity_wh > 0.0 {
                self.level_wh / self.capacity_wh
            } else {
                0.0
            },
            operational: self.operational,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online(capacity: f64, level: f64) -> PowerLedger {
        let mut l = PowerLedger::new(capacity, level).expect("valid ledger");
        l.power_on();
        l
    }

    #[test]
    fn offline_ledger_moves_no_energy() {
        let mut l = PowerLedger::new(200.0, 100.0).expect("valid ledger");
        assert_eq!(l.max_draw_watts(1.0), 0.0);
        assert_eq!(l.draw(50.0, 1.0), 0.0);
        assert_eq!(l.charge(50.0, 1.0), 0.0);
        assert_eq!(l.level_wh(), 100.0);
    }

    #[test]
    fn draw_limited_by_stored_energy() {
        let mut l = online(200.0, 30.0);
        // 60 W for 1 h needs 60 Wh, only 30 Wh stored
        assert_eq!(l.draw(60.0, 1.0), 30.0);
        assert_eq!(l.level_wh(), 0.0);
        assert_eq!(l.draw(60.0, 1.0), 0.0);
    }

    #[test]
    fn draw_within_budget() {
        let mut l = online(200.0, 200.0);
        assert_eq!(l.draw(360.0, 0.25), 360.0);
        assert!((l.level_wh() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn charge_capped_at_capacity() {
        let mut l = online(200.0, 190.0);
        assert_eq!(l.charge(100.0, 1.0), 10.0);
        assert_eq!(l.level_wh(), 200.0);
        assert_eq!(l.status().state_of_charge, 1.0);
    }

    #[test]
    fn initial_level_clamped_and_invalid_rejected() {
        let l = PowerLedger::new(100.0, 150.0).expect("valid ledger");
        assert_eq!(l.level_wh(), 100.0);
        assert!(PowerLedger::new(-1.0, 0.0).is_err());
        assert!(PowerLedger::new(10.0, -1.0).is_err());
    }

    #[test]
    fn status_fields() {
        let l = online(200.0, 50.0);
        let s = l.status();
        assert_eq!(s.battery_capacity_wh, 200.0);
        assert_eq!(s.battery_level_wh, 50.0);
        assert_eq!(s.state_of_charge, 0.25);
        assert!(s.operational);
    }
}
