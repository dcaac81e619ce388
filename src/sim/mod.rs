/// Simulated tick clock with time-of-day.
pub mod clock;
pub mod cluster;
pub mod controller;
pub mod kpi;
/// Battery power-budget ledger.
pub mod ledger;
pub mod types;

pub use cluster::{ActivationReport, Cluster, ClusterStatus, CycleOutcome};
pub use controller::{Controller, ControllerParams, PistonDrive};
pub use kpi::RunSummary;
pub use ledger::{BatteryStatus, PowerLedger};
pub use types::{SimConfig, SystemStatus, TickResult};
