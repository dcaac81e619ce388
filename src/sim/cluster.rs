//! Group of identical cooling units sharing one power budget and lifecycle.

use serde::Serialize;
use tracing::{info, warn};

use crate::devices::{CoolingUnit, UnitSpec, UnitStatus};
use crate::error::{CryoError, Result, check_duration};

/// Canonical number of units in a cluster.
pub const DEFAULT_UNIT_COUNT: usize = 9;

/// Outcome of [`Cluster::activate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationReport {
    /// True iff every unit reached the operational state.
    pub operational: bool,
    /// Ids of units that stayed inactive.
    pub failed_units: Vec<String>,
}

/// Outcome of [`Cluster::run_cooling_cycle`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The cluster was not operational; nothing ran.
    NotOperational,
    /// Every unit cooled; `unit_drops_c` is ordered like the units.
    Cooled { unit_drops_c: Vec<f64> },
}

impl CycleOutcome {
    pub fn cooled(&self) -> bool {
        matches!(self, Self::Cooled { .. })
    }
}

/// Point-in-time view of the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStatus {
    pub cluster_id: String,
    pub operational: bool,
    pub ambient_temp_c: f64,
    pub power_budget_watts: f64,
    /// Airflow moved by the running unit fans (ft³/min).
    pub airflow_cfm: f64,
    pub unit_statuses: Vec<UnitStatus>,
}

/// Fixed, ordered set of cooling units with an all-or-nothing activation
/// policy: the cluster is operational only while every unit is.
///
/// Each unit is allocated `power_budget_watts / unit_count`.
#[derive(Debug, Clone)]
pub struct Cluster {
    cluster_id: String,
    power_budget_watts: f64,
    ambient_temp_c: f64,
    spec: UnitSpec,
    units: Vec<CoolingUnit>,
    operational: bool,
}

impl Cluster {
    /// Builds `unit_count` units named `{cluster_id}_core{n}` (1-based).
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidPowerBudget`] for a negative or non-finite budget,
    /// [`CryoError::InvalidParameter`] for a zero unit count.
    pub fn new(
        cluster_id: impl Into<String>,
        power_budget_watts: f64,
        unit_count: usize,
        ambient_temp_c: f64,
        spec: UnitSpec,
    ) -> Result<Self> {
        if !power_budget_watts.is_finite() || power_budget_watts < 0.0 {
            return Err(CryoError::InvalidPowerBudget(power_budget_watts));
        }
        if unit_count == 0 {
            return Err(CryoError::InvalidParameter {
                name: "unit_count",
                reason: "must be > 0".into(),
            });
        }

        let cluster_id = cluster_id.into();
        let unit_power = power_budget_watts / unit_count as f64;
        let units = (1..=unit_count)
            .map(|n| {
                CoolingUnit::new(format!("{cluster_id}_core{n}"), unit_power, ambient_temp_c, spec)
            })
            .collect();

        Ok(Self {
            cluster_id,
            power_budget_watts,
            ambient_temp_c,
            spec,
            units,
            operational: false,
        })
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn power_budget_watts(&self) -> f64 {
        self.power_budget_watts
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn units(&self) -> &[CoolingUnit] {
        &self.units
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Per-unit power allocation (W).
    pub fn unit_allocation_watts(&self) -> f64 {
        self.power_budget_watts / self.units.len() as f64
    }

    /// Least total supply at which every unit can run (W).
    pub fn min_operating_watts(&self) -> f64 {
        self.spec.min_operating_watts * self.units.len() as f64
    }

    /// Total cooling capacity of all operational units (W).
    pub fn cooling_capacity_watts(&self) -> f64 {
        self.units.iter().map(CoolingUnit::cooling_capacity_watts).sum()
    }

    /// Airflow moved by the running unit fans (ft³/min).
    pub fn airflow_cfm(&self) -> f64 {
        self.units.iter().map(|u| u.fan().delivered_airflow_cfm()).sum()
    }

    /// Starts every unit; the cluster becomes operational iff all of them do.
    pub fn activate(&mut self) -> ActivationReport {
        let failed_units: Vec<String> = self
            .units
            .iter_mut()
            .filter_map(|unit| (!unit.startup()).then(|| unit.id().to_string()))
            .collect();
        self.operational = failed_units.is_empty();

        if self.operational {
            info!(
                cluster = %self.cluster_id,
                units = self.units.len(),
                "cluster fully operational"
            );
        } else {
            warn!(
                cluster = %self.cluster_id,
                failed = failed_units.len(),
                "cluster failed to activate all units"
            );
        }

        ActivationReport {
            operational: self.operational,
            failed_units,
        }
    }

    /// Runs one cooling cycle of `seconds` on every unit.
    ///
    /// Units are independent within a cycle. The outcome is assembled only
    /// after every unit has finished.
    ///
    /// # Errors
    ///
    /// [`CryoError::InvalidDuration`] for non-positive `seconds`.
    pub fn run_cooling_cycle(&mut self, seconds: f64) -> Result<CycleOutcome> {
        let seconds = check_duration(seconds)?;
        if !self.operational {
            warn!(cluster = %self.cluster_id, "cluster not operational, skipping cooling cycle");
            return Ok(CycleOutcome::NotOperational);
        }

        let unit_drops_c = self
            .units
            .iter_mut()
            .map(|unit| unit.cool(seconds))
            .collect::<Result<Vec<f64>>>()?;
        Ok(CycleOutcome::Cooled { unit_drops_c })
    }

    /// Shuts every unit down. Idempotent.
    pub fn shutdown(&mut self) {
        if self.operational {
            info!(cluster = %self.cluster_id, "shutting down cluster");
        }
        for unit in &mut self.units {
            unit.shutdown();
        }
        self.operational = false;
    }

    pub fn status(&self) -> ClusterStatus {
        ClusterStatus {
            cluster_id: self.cluster_id.clone(),
            operational: self.operational,
            ambient_temp_c: self.ambient_temp_c,
            power_budget_watts: self.power_budget_watts,
            airflow_cfm: self.airflow_cfm(),
            unit_statuses: self.units.iter().map(CoolingUnit::status).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(budget: f64) -> Cluster {
        Cluster::new("hp1", budget, DEFAULT_UNIT_COUNT, 45.0, UnitSpec::default())
            .expect("valid cluster")
    }

    #[test]
    fn units_share_budget_evenly() {
        let c = cluster(360.0);
        assert_eq!(c.unit_count(), 9);
        assert_eq!(c.unit_allocation_watts(), 40.0);
        assert!(c.units().iter().all(|u| u.rated_input_watts() == 40.0));
        assert_eq!(c.units()[0].id(), "hp1_core1");
        assert_eq!(c.units()[8].id(), "hp1_core9");
    }

    #[test]
    fn activation_with_sufficient_budget() {
        let mut c = cluster(360.0);
        let report = c.activate();
        assert!(report.operational);
        assert!(report.failed_units.is_empty());
        assert!(c.is_operational());
        assert!(c.units().iter().all(CoolingUnit::is_operational));
        assert!((c.cooling_capacity_watts() - 54.0).abs() < 1e-9);
        assert!(c.units().iter().all(|u| u.fan().is_active()));
        assert_eq!(c.airflow_cfm(), 9.0 * 150.0);
    }

    #[test]
    fn activation_with_insufficient_budget() {
        // 40 W / 9 units = 4.44 W < 5 W threshold
        let mut c = cluster(40.0);
        let report = c.activate();
        assert!(!report.operational);
        assert_eq!(report.failed_units.len(), 9);
        assert!(!c.is_operational());
        assert!(c.units().iter().all(|u| !u.is_operational()));
        assert_eq!(c.airflow_cfm(), 0.0);
    }

    #[test]
    fn cycle_is_noop_when_not_operational() {
        let mut c = cluster(360.0);
        assert_eq!(c.run_cooling_cycle(60.0), Ok(CycleOutcome::NotOperational));
        assert!(c.units().iter().all(|u| u.internal_temp_c() == 45.0));
    }

    #[test]
    fn cycle_cools_every_unit() {
        let mut c = cluster(360.0);
        c.activate();
        let outcome = c.run_cooling_cycle(100.0).expect("valid duration");
        assert!(outcome.cooled());
        match outcome {
            CycleOutcome::Cooled { unit_drops_c } => {
                assert_eq!(unit_drops_c.len(), 9);
                assert!(unit_drops_c.iter().all(|d| (d - 0.12).abs() < 1e-9));
            }
            CycleOutcome::NotOperational => panic!("expected a cooled cycle"),
        }
    }

    #[test]
    fn cycle_rejects_invalid_duration() {
        let mut c = cluster(360.0);
        c.activate();
        assert_eq!(
            c.run_cooling_cycle(0.0),
            Err(CryoError::InvalidDuration(0.0))
        );
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut c = cluster(360.0);
        c.activate();
        c.shutdown();
        c.shutdown();
        assert!(!c.is_operational());
        assert!(c.units().iter().all(|u| !u.is_operational()));
        assert_eq!(c.cooling_capacity_watts(), 0.0);
        assert_eq!(c.airflow_cfm(), 0.0);
        assert!(c.status().unit_statuses.iter().all(|u| !u.fan.active));
    }

    #[test]
    fn status_lists_units_in_order() {
        let mut c = cluster(360.0);
        c.activate();
        let s = c.status();
        assert_eq!(s.cluster_id, "hp1");
        assert!(s.operational);
        assert_eq!(s.ambient_temp_c, 45.0);
        let ids: Vec<&str> = s.unit_statuses.iter().map(|u| u.unit_id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"hp1_core1"));
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn invalid_construction_rejected() {
        assert_eq!(
            Cluster::new("x", -1.0, 9, 45.0, UnitSpec::default()).err(),
            Some(CryoError::InvalidPowerBudget(-1.0))
        );
        assert!(Cluster::new("x", 100.0, 0, 45.0, UnitSpec::default()).is_err());
    }
}
