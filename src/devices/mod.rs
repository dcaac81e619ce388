//! Device components: power supplies, cooling units and their fans.

/// Thermoelectric cooling element and its lifecycle.
pub mod cooling_unit;
/// Vortex dispersion fan carried by each cooling unit.
pub mod fan;
/// Solar, piston, grid and battery power sources.
pub mod power;
pub mod types;

// Re-export the main types for convenience
pub use cooling_unit::{CoolingUnit, UnitSpec, UnitState, UnitStatus};
pub use fan::{FanEmitter, FanStatus};
pub use power::{PowerSource, SourceType};
pub use types::DriveContext;
pub use types::PowerSupply;
