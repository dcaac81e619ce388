/// Simulated-time position of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Zero-based tick index.
    pub index: usize,
    /// Simulated seconds elapsed before this tick starts.
    pub elapsed_seconds: f64,
    /// Hour of day in `[0, 24)` at the start of this tick.
    pub time_of_day: f64,
}

/// A simulation clock that advances in fixed steps of simulated time.
///
/// Simulated time never reads the wall clock; it only moves when
/// [`tick`](Self::tick) is called.
///
/// # Examples
///
/// ```
/// use cryocore_sim::sim::clock::SimClock;
///
/// let mut clock = SimClock::new(3, 3600.0, 11.0);
/// let mut hours = Vec::new();
///
/// clock.run(|tick| hours.push(tick.time_of_day));
/// assert_eq!(hours, vec![11.0, 12.0, 13.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Next tick index to hand out
    current: usize,
    /// Total ticks to run; `None` runs unbounded
    total: Option<usize>,
    cycle_seconds: f64,
    start_hour: f64,
}

impl SimClock {
    /// Creates a clock for `total` ticks of `cycle_seconds` each, starting
    /// at `start_hour` on the simulated day.
    pub fn new(total: usize, cycle_seconds: f64, start_hour: f64) -> Self {
        Self {
            current: 0,
            total: Some(total),
            cycle_seconds,
            start_hour: start_hour.rem_euclid(24.0),
        }
    }

    /// Creates a clock with no tick limit.
    pub fn unbounded(cycle_seconds: f64, start_hour: f64) -> Self {
        Self {
            total: None,
            ..Self::new(0, cycle_seconds, start_hour)
        }
    }

    pub fn cycle_seconds(&self) -> f64 {
        self.cycle_seconds
    }

    /// Simulated seconds elapsed so far.
    pub fn elapsed_seconds(&self) -> f64 {
        self.current as f64 * self.cycle_seconds
    }

    /// Hour of day for the next tick.
    pub fn time_of_day(&self) -> f64 {
        (self.start_hour + self.elapsed_seconds() / 3600.0).rem_euclid(24.0)
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick that starts now
    /// * `None` - If the clock has reached its total ticks
    pub fn tick(&mut self) -> Option<Tick> {
        if self.total.is_some_and(|total| self.current >= total) {
            return None;
        }
        let tick = Tick {
            index: self.current,
            elapsed_seconds: self.elapsed_seconds(),
            time_of_day: self.time_of_day(),
        };
        self.current += 1;
        Some(tick)
    }

    /// Runs a function for each remaining tick.
    ///
    /// Never returns for an unbounded clock.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = SimClock::new(5, 10.0, 8.0);
        assert_eq!(clock.current, 0);
        assert_eq!(clock.total, Some(5));
        assert_eq!(clock.time_of_day(), 8.0);
    }

    #[test]
    fn test_tick() {
        let mut clock = SimClock::new(2, 1800.0, 6.0);
        let first = clock.tick().expect("first tick");
        assert_eq!(first.index, 0);
        assert_eq!(first.elapsed_seconds, 0.0);
        assert_eq!(first.time_of_day, 6.0);
        let second = clock.tick().expect("second tick");
        assert_eq!(second.elapsed_seconds, 1800.0);
        assert_eq!(second.time_of_day, 6.5);
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_time_of_day_wraps_midnight() {
        let mut clock = SimClock::new(3, 3600.0, 23.0);
        let hours: Vec<f64> = std::iter::from_fn(|| clock.tick())
            .map(|t| t.time_of_day)
            .collect();
        assert_eq!(hours, vec![23.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = SimClock::new(0, 10.0, 0.0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }

    #[test]
    fn test_unbounded_clock_keeps_ticking() {
        let mut clock = SimClock::unbounded(60.0, 0.0);
        for i in 0..1000 {
            assert_eq!(clock.tick().map(|t| t.index), Some(i));
        }
    }

    #[test]
    fn test_start_hour_normalized() {
        let clock = SimClock::new(1, 10.0, 30.0);
        assert_eq!(clock.time_of_day(), 6.0);
    }
}
