//! Error types for construction-time and tick-time contract violations.
//!
//! Insufficient power and physical-bound clamping are not errors: they are
//! reported through return values and snapshots.

use thiserror::Error;

/// Errors raised by the simulation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CryoError {
    /// Air-volume geometry with a non-positive or non-finite dimension.
    #[error("invalid geometry: radius {radius_ft} ft, height {height_ft} ft (both must be > 0)")]
    InvalidGeometry { radius_ft: f64, height_ft: f64 },

    /// Negative or non-finite power budget.
    #[error("invalid power budget: {0} W (must be >= 0)")]
    InvalidPowerBudget(f64),

    /// Zero, negative or non-finite duration passed to a tick operation.
    #[error("invalid duration: {0} s (must be > 0)")]
    InvalidDuration(f64),

    /// Any other out-of-range construction parameter.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CryoError>;

/// Rejects durations that would apply a zero, negative or undefined effect.
pub(crate) fn check_duration(seconds: f64) -> Result<f64> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(CryoError::InvalidDuration(seconds))
    }
}
