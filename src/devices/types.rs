//! Common types and traits for power-producing devices.

use rand::{Rng, rngs::StdRng};

/// External driving parameters passed to a power source for one tick.
///
/// # Fields
/// * `time_of_day` - Hour of day in `[0, 24)`, drives solar output
/// * `rate` - Impulse rate in `[0, 1]`, drives piston output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveContext {
    pub time_of_day: Option<f64>,
    pub rate: Option<f64>,
}

impl DriveContext {
    /// Creates a context carrying only the hour of day.
    pub fn at_hour(time_of_day: f64) -> Self {
        Self {
            time_of_day: Some(time_of_day),
            rate: None,
        }
    }

    /// Creates a context carrying only a kinetic impulse rate.
    pub fn with_rate(rate: f64) -> Self {
        Self {
            time_of_day: None,
            rate: Some(rate),
        }
    }
}

/// Capability interface for anything that can feed the cluster.
///
/// Lets the controller run against a simulated source or a hardware-backed
/// reading without changing the tick logic.
pub trait PowerSupply {
    /// Available output in watts for the given driving conditions.
    ///
    /// Never negative. Returns `0.0` while the supply is inactive.
    fn current_output(&self, context: &DriveContext) -> f64;

    /// Whether the supply currently delivers power.
    fn is_active(&self) -> bool;

    fn activate(&mut self);

    fn deactivate(&mut self);

    /// Human-readable supply kind.
    fn supply_type(&self) -> &'static str;

    /// Whether delivered energy comes out of the battery ledger rather than
    /// from generation.
    fn draws_from_storage(&self) -> bool {
        false
    }
}

/// Draws a kinetic impulse rate uniformly from `[low, high]`.
///
/// Bounds are clamped into `[0, 1]` and swapped if reversed.
pub fn random_impulse(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    let lo = low.clamp(0.0, 1.0);
    let hi = high.clamp(0.0, 1.0);
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi - lo <= f64::EPSILON {
        return lo;
    }
    rng.random_range(lo..=hi)
}
