//! CryoCore: simulation of a powered thermoelectric cooling installation.

#[cfg(feature = "api")]
pub mod api;
/// TOML scenario configuration and presets.
pub mod config;
pub mod devices;
pub mod error;
/// CSV export.
pub mod io;
pub mod reporting;
/// Cluster, controller, ledger and run summary.
pub mod sim;
pub mod thermal;

pub use error::{CryoError, Result};
