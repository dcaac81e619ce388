//! Thermal models: energy balance, residual-cooling memory and the air column.

/// Applied power to temperature delta conversion.
pub mod cooling_model;
pub mod environment;
/// Exponential-decay residual cooling estimator.
pub mod memory;
/// Enclosure conduction model.
pub mod shell;
pub mod units;

pub use cooling_model::CoolingModel;
pub use environment::{Environment, EnvironmentParams, EnvironmentReport};
pub use memory::ThermalMemory;
pub use shell::{ShellMaterial, StructureShell};
pub use units::AirVolume;
