//! Exponential-decay estimate of residual cooling between active cycles.

use std::time::{Duration, Instant};

use crate::error::{CryoError, Result};

/// Remembers the last actively cooled temperature and estimates how far it
/// has relaxed back toward ambient since.
///
/// `estimate = last + (ambient - last) * (1 - 0.5^(elapsed / half_life))`
///
/// Elapsed time is wall-clock time, not simulated tick duration.
#[derive(Debug, Clone)]
pub struct ThermalMemory {
    last_temp_c: Option<f64>,
    last_recorded: Instant,
    half_life: Duration,
}

impl ThermalMemory {
    /// # Errors
    ///
    /// Returns [`CryoError::InvalidParameter`] if `half_life_secs` is not
    /// a positive finite number or does not fit in a [`Duration`].
    pub fn new(half_life_secs: f64) -> Result<Self> {
        if !(half_life_secs.is_finite() && half_life_secs > 0.0) {
            return Err(CryoError::InvalidParameter {
                name: "memory_half_life_sec",
                reason: format!("must be > 0, got {half_life_secs}"),
            });
        }
        let half_life =
            Duration::try_from_secs_f64(half_life_secs).map_err(|e| CryoError::InvalidParameter {
                name: "memory_half_life_sec",
                reason: format!("{half_life_secs} s is not a representable duration: {e}"),
            })?;
        Ok(Self {
            last_temp_c: None,
            last_recorded: Instant::now(),
            half_life,
        })
    }

    pub fn half_life_secs(&self) -> f64 {
        self.half_life.as_secs_f64()
    }

    pub fn last_temp_c(&self) -> Option<f64> {
        self.last_temp_c
    }

    /// Stores `temp_c` stamped with the current instant. Later calls overwrite.
    pub fn record(&mut self, temp_c: f64) {
        self.record_at(temp_c, Instant::now());
    }

    /// Stores `temp_c` stamped with `at`.
    pub fn record_at(&mut self, temp_c: f64, at: Instant) {
        self.last_temp_c = Some(temp_c);
        self.last_recorded = at;
    }

    /// Estimated temperature now, given the current `ambient_c`.
    pub fn estimate(&self, ambient_c: f64) -> f64 {
        self.estimate_at(ambient_c, Instant::now())
    }

    /// Estimated temperature at instant `now`. Returns `ambient_c` if nothing
    /// was recorded; instants before the record count as zero elapsed time.
    pub fn estimate_at(&self, ambient_c: f64, now: Instant) -> f64 {
        let Some(last) = self.last_temp_c else {
            return ambient_c;
        };
        let elapsed = now.saturating_duration_since(self.last_recorded);
        let decay = 0.5_f64.powf(elapsed.as_secs_f64() / self.half_life.as_secs_f64());
        last + (ambient_c - last) * (1.0 - decay)
    }
}
