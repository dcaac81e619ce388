//! Post-hoc run summary computed from tick results.

use std::fmt;

use serde::Serialize;

use super::types::TickResult;

/// Aggregate indicators derived from a complete simulation run.
///
/// Computed post-hoc from `&[TickResult]` so the summary always agrees with
/// the per-tick records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of ticks summarized.
    pub ticks: usize,
    /// Lowest end-of-tick air temperature (°C).
    pub min_temp_c: f64,
    /// Air temperature after the last tick (°C).
    pub final_temp_c: f64,
    /// Mean end-of-tick air temperature (°C).
    pub mean_temp_c: f64,
    /// Sum of active-cooling drops (°C).
    pub total_drop_c: f64,
    /// Sum of passive-reheat rises (°C).
    pub total_gain_c: f64,
    /// Energy delivered to the cluster (Wh).
    pub delivered_energy_wh: f64,
    /// Ticks in which the cluster ran a cooling cycle.
    pub cooled_ticks: usize,
    /// Ticks in which supply fell below the cluster's operating threshold.
    pub shortfall_ticks: usize,
}

impl RunSummary {
    /// Computes the summary from the complete tick record slice.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation tick results
    /// * `dt_hours` - Tick duration in hours
    pub fn from_results(results: &[TickResult], dt_hours: f64) -> Self {
        if results.is_empty() {
            return Self {
                ticks: 0,
                min_temp_c: 0.0,
                final_temp_c: 0.0,
                mean_temp_c: 0.0,
                total_drop_c: 0.0,
                total_gain_c: 0.0,
                delivered_energy_wh: 0.0,
                cooled_ticks: 0,
                shortfall_ticks: 0,
            };
        }

        let mut min_temp = f64::INFINITY;
        let mut temp_sum = 0.0;
        let mut drop_sum = 0.0;
        let mut gain_sum = 0.0;
        let mut delivered_wh = 0.0;
        let mut cooled = 0_usize;
        let mut shortfalls = 0_usize;

        for r in results {
            min_temp = min_temp.min(r.env_temp_c);
            temp_sum += r.env_temp_c;
            drop_sum += r.temp_drop_c;
            gain_sum += r.temp_gain_c;
            delivered_wh += r.delivered_watts * dt_hours;
            if r.cooled {
                cooled += 1;
            }
            if r.power_shortfall {
                shortfalls += 1;
            }
        }

        let final_temp_c = results.last().map_or(0.0, |r| r.env_temp_c);

        Self {
            ticks: results.len(),
            min_temp_c: min_temp,
            final_temp_c,
            mean_temp_c: temp_sum / results.len() as f64,
            total_drop_c: drop_sum,
            total_gain_c: gain_sum,
            delivered_energy_wh: delivered_wh,
            cooled_ticks: cooled,
            shortfall_ticks: shortfalls,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Ticks:                 {}", self.ticks)?;
        writeln!(f, "Min temperature:       {:.3} C", self.min_temp_c)?;
        writeln!(f, "Final temperature:     {:.3} C", self.final_temp_c)?;
        writeln!(f, "Mean temperature:      {:.3} C", self.mean_temp_c)?;
        writeln!(f, "Total cooling drop:    {:.3} C", self.total_drop_c)?;
        writeln!(f, "Total passive gain:    {:.3} C", self.total_gain_c)?;
        writeln!(f, "Delivered energy:      {:.2} Wh", self.delivered_energy_wh)?;
        writeln!(f, "Cooled ticks:          {}", self.cooled_ticks)?;
        write!(f, "Shortfall ticks:       {}", self.shortfall_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(env_temp_c: f64, delivered_watts: f64, cooled: bool) -> TickResult {
        TickResult {
            tick: 0,
            time_s: 0.0,
            time_of_day: 12.0,
            drive_rate: 1.0,
            source_watts: delivered_watts,
            delivered_watts,
            stored_watts: 0.0,
            cooled,
            power_shortfall: !cooled,
            temp_drop_c: if cooled { 0.5 } else { 0.0 },
            temp_gain_c: 0.25,
            env_temp_c,
            mean_unit_temp_c: env_temp_c,
            battery_level_wh: 0.0,
        }
    }

    #[test]
    fn temperature_statistics() {
        let results: Vec<TickResult> = [44.0, 42.0, 43.0, 45.0]
            .iter()
            .map(|&t| make_result(t, 0.0, false))
            .collect();
        let s = RunSummary::from_results(&results, 1.0);
        assert_eq!(s.ticks, 4);
        assert_eq!(s.min_temp_c, 42.0);
        assert_eq!(s.final_temp_c, 45.0);
        assert!((s.mean_temp_c - 43.5).abs() < 1e-9);
        assert!((s.total_gain_c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn delivered_energy_and_counts() {
        // 360 W for 3 ticks of 0.25 h = 270 Wh
        let mut results = vec![make_result(45.0, 360.0, true); 3];
        results.push(make_result(45.0, 0.0, false));
        let s = RunSummary::from_results(&results, 0.25);
        assert!((s.delivered_energy_wh - 270.0).abs() < 1e-9);
        assert_eq!(s.cooled_ticks, 3);
        assert_eq!(s.shortfall_ticks, 1);
        assert!((s.total_drop_c - 1.5).abs() < 1e-9);
    }

    #[test]
    fn empty_results() {
        let s = RunSummary::from_results(&[], 1.0);
        assert_eq!(s.ticks, 0);
        assert_eq!(s.cooled_ticks, 0);
        assert_eq!(s.delivered_energy_wh, 0.0);
    }

    #[test]
    fn display_lists_every_indicator() {
        let s = RunSummary::from_results(&[make_result(44.0, 360.0, true)], 1.0);
        let text = s.to_string();
        for label in [
            "Min temperature:",
            "Final temperature:",
            "Delivered energy:",
            "Shortfall ticks:",
        ] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
