//! Tick orchestrator tying the power source, cluster and environment together.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::devices::types::random_impulse;
use crate::devices::{DriveContext, PowerSupply, UnitSpec};
use crate::error::Result;
use crate::reporting::StatusSink;
use crate::thermal::environment::round2;
use crate::thermal::{Environment, EnvironmentParams};

use super::clock::SimClock;
use super::cluster::{ActivationReport, Cluster, DEFAULT_UNIT_COUNT};
use super::ledger::PowerLedger;
use super::types::{SimConfig, SystemStatus, TickResult};

/// Lower bound of a random kinetic impulse.
pub const PISTON_IMPULSE_MIN: f64 = 0.2;
/// Upper bound of a random kinetic impulse.
pub const PISTON_IMPULSE_MAX: f64 = 1.0;

/// Largest tick count `run` reserves result storage for up front.
const MAX_PREALLOCATED_TICKS: usize = 1 << 16;

/// How the kinetic impulse rate is chosen each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PistonDrive {
    /// Same rate every tick.
    Fixed(f64),
    /// Seeded uniform draw in `[PISTON_IMPULSE_MIN, PISTON_IMPULSE_MAX]`.
    Random,
}

impl PistonDrive {
    fn next_rate(self, rng: &mut StdRng) -> f64 {
        match self {
            Self::Fixed(rate) => rate,
            Self::Random => random_impulse(rng, PISTON_IMPULSE_MIN, PISTON_IMPULSE_MAX),
        }
    }
}

/// Installation parameters for a [`Controller`].
#[derive(Debug, Clone)]
pub struct ControllerParams {
    pub cluster_id: String,
    pub power_budget_watts: f64,
    pub unit_count: usize,
    pub unit_spec: UnitSpec,
    pub environment: EnvironmentParams,
    pub piston: PistonDrive,
    pub battery_capacity_wh: f64,
    pub battery_initial_wh: f64,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            cluster_id: "cryocore".into(),
            power_budget_watts: 360.0,
            unit_count: DEFAULT_UNIT_COUNT,
            unit_spec: UnitSpec::default(),
            environment: EnvironmentParams::default(),
            piston: PistonDrive::Fixed(1.0),
            battery_capacity_wh: 0.0,
            battery_initial_wh: 0.0,
        }
    }
}

/// Owns the environment, the cluster, the power supply and the battery
/// ledger, and advances them one simulated tick at a time.
///
/// Generic over `P: PowerSupply` so a simulated source and a
/// hardware-backed reading share the same tick logic.
pub struct Controller<P: PowerSupply> {
    config: SimConfig,
    clock: SimClock,
    environment: Environment,
    cluster: Cluster,
    supply: P,
    ledger: PowerLedger,
    piston: PistonDrive,
    rng: StdRng,
    operational: bool,
    ticks_completed: usize,
}

impl<P: PowerSupply> Controller<P> {
    /// Builds every component from `params`. Nothing runs until
    /// [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Propagates construction failures of the environment, the cluster or
    /// the ledger.
    pub fn new(config: SimConfig, params: ControllerParams, supply: P) -> Result<Self> {
        let environment = Environment::new(params.environment)?;
        let cluster = Cluster::new(
            params.cluster_id,
            params.power_budget_watts,
            params.unit_count,
            params.environment.ambient_temp_c,
            params.unit_spec,
        )?;
        let ledger = PowerLedger::new(params.battery_capacity_wh, params.battery_initial_wh)?;
        let clock = SimClock::unbounded(config.cycle_seconds, config.start_hour);
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            clock,
            environment,
            cluster,
            supply,
            ledger,
            piston: params.piston,
            rng,
            operational: false,
            ticks_completed: 0,
        })
    }

    /// Powers on the supply and the ledger and activates the cluster.
    ///
    /// The controller runs ticks even if activation fails; such ticks
    /// never cool.
    pub fn initialize(&mut self) -> ActivationReport {
        self.supply.activate();
        self.ledger.power_on();
        let report = self.cluster.activate();
        self.operational = true;
        info!(
            cluster = %self.cluster.cluster_id(),
            source = self.supply.supply_type(),
            cluster_operational = report.operational,
            "controller initialized"
        );
        report
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn ticks_completed(&self) -> usize {
        self.ticks_completed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn ledger(&self) -> &PowerLedger {
        &self.ledger
    }

    pub fn supply(&self) -> &P {
        &self.supply
    }

    /// Advances one tick. Returns `Ok(None)` while the controller is not
    /// operational (before `initialize` or after `shutdown`).
    ///
    /// Order within a tick: source output, budget and ledger limits,
    /// cooling (only if the cluster is operational and the delivered power
    /// covers every unit's minimum), passive reheat.
    pub fn step(&mut self) -> Result<Option<TickResult>> {
        if !self.operational {
            return Ok(None);
        }
        let Some(tick) = self.clock.tick() else {
            return Ok(None);
        };
        let seconds = self.clock.cycle_seconds();
        let hours = seconds / 3600.0;

        // 1. Source output for this tick
        let drive_rate = self.piston.next_rate(&mut self.rng);
        let context = DriveContext {
            time_of_day: Some(tick.time_of_day),
            rate: Some(drive_rate),
        };
        let source_watts = self.supply.current_output(&context);

        // 2. Budget cap, then ledger limit for a stored-energy source
        let storage = self.supply.draws_from_storage();
        let requested = source_watts.min(self.cluster.power_budget_watts());
        let available = if storage {
            requested.min(self.ledger.max_draw_watts(hours))
        } else {
            requested
        };

        // 3. Cooling or shortfall
        let runs = self.cluster.is_operational() && available >= self.cluster.min_operating_watts();
        let power_shortfall = self.cluster.is_operational() && !runs;
        let mut delivered_watts = 0.0;
        let mut temp_drop_c = 0.0;
        let mut cooled = false;
        if runs {
            delivered_watts = if storage {
                self.ledger.draw(available, hours)
            } else {
                available
            };
            cooled = self.cluster.run_cooling_cycle(seconds)?.cooled();
            temp_drop_c = self.environment.apply_cooling(delivered_watts, seconds)?;
        } else if power_shortfall {
            debug!(
                tick = tick.index,
                available_w = available,
                required_w = self.cluster.min_operating_watts(),
                "power shortfall, skipping cooling"
            );
        }

        // 4. Generation surplus charges the ledger
        let stored_watts = if storage {
            0.0
        } else {
            self.ledger.charge(source_watts - delivered_watts, hours)
        };

        // 5. Passive reheat
        let temp_gain_c = self.environment.recover_heat(seconds, None)?;

        self.ticks_completed += 1;
        let units = self.cluster.units();
        let mean_unit_temp_c =
            units.iter().map(|u| u.internal_temp_c()).sum::<f64>() / units.len() as f64;

        Ok(Some(TickResult {
            tick: tick.index,
            time_s: tick.elapsed_seconds + seconds,
            time_of_day: tick.time_of_day,
            drive_rate,
            source_watts,
            delivered_watts,
            stored_watts,
            cooled,
            power_shortfall,
            temp_drop_c,
            temp_gain_c,
            env_temp_c: self.environment.current_temp_c(),
            mean_unit_temp_c,
            battery_level_wh: self.ledger.level_wh(),
        }))
    }

    /// Runs up to `ticks` ticks, publishing a status snapshot to `sink`
    /// every `report_every` ticks. Stops early if the controller is not
    /// operational.
    pub fn run(&mut self, ticks: usize, sink: &mut impl StatusSink) -> Result<Vec<TickResult>> {
        let mut results = Vec::with_capacity(ticks.min(MAX_PREALLOCATED_TICKS));
        for _ in 0..ticks {
            let Some(result) = self.step()? else {
                break;
            };
            results.push(result);
            let every = self.config.report_every;
            if every > 0 && self.ticks_completed % every == 0 {
                sink.publish(&self.status());
            }
        }
        Ok(results)
    }

    /// Stops the supply, the cluster and the ledger. Idempotent; returns
    /// whether this call did the shutdown.
    pub fn shutdown(&mut self) -> bool {
        if !self.operational {
            return false;
        }
        self.cluster.shutdown();
        self.supply.deactivate();
        self.ledger.power_off();
        self.operational = false;
        info!(
            cluster = %self.cluster.cluster_id(),
            ticks = self.ticks_completed,
            "controller shut down"
        );
        true
    }

    /// Read-only snapshot, no side effects.
    pub fn status(&self) -> SystemStatus {
        let environment = self.environment.report();
        SystemStatus {
            cluster_id: self.cluster.cluster_id().to_string(),
            operational: self.operational,
            ambient_temp_c: environment.current_temp_c,
            estimated_temp_c: round2(self.environment.estimated_temp_c()),
            ticks_completed: self.ticks_completed,
            source_type: self.supply.supply_type(),
            environment,
            cluster_status: self.cluster.status(),
            battery_status: self.ledger.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{PowerSource, SourceType};
    use crate::reporting::{MemorySink, NullSink};

    fn controller(
        source_type: SourceType,
        max_watts: f64,
        params: ControllerParams,
    ) -> Controller<PowerSource> {
        let config = SimConfig::new(10, 10.0, 12.0, 42).expect("valid config");
        let source = PowerSource::new(source_type, max_watts).expect("valid source");
        Controller::new(config, params, source).expect("valid controller")
    }

    fn strong_params() -> ControllerParams {
        ControllerParams {
            power_budget_watts: 2000.0,
            ..ControllerParams::default()
        }
    }

    #[test]
    fn step_before_initialize_does_nothing() {
        let mut c = controller(SourceType::Grid, 360.0, ControllerParams::default());
        assert_eq!(c.step().expect("step"), None);
        assert_eq!(c.ticks_completed(), 0);
    }

    #[test]
    fn strong_supply_cools_below_ambient() {
        let mut c = controller(SourceType::Grid, 2000.0, strong_params());
        assert!(c.initialize().operational);
        let results = c.run(10, &mut NullSink).expect("run");
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.cooled && !r.power_shortfall));
        assert!(results.iter().all(|r| r.delivered_watts == 2000.0));
        let last = results.last().expect("ten results");
        assert!(last.env_temp_c < 45.0);
        assert!(last.mean_unit_temp_c < 45.0);
        assert_eq!(last.time_s, 100.0);
    }

    #[test]
    fn budget_caps_delivered_power() {
        let mut c = controller(SourceType::Grid, 1000.0, ControllerParams::default());
        c.initialize();
        let r = c.step().expect("step").expect("operational");
        assert_eq!(r.source_watts, 1000.0);
        assert_eq!(r.delivered_watts, 360.0);
    }

    #[test]
    fn weak_supply_is_a_shortfall() {
        // 40 W is below 9 units x 5 W
        let mut c = controller(SourceType::Grid, 40.0, ControllerParams::default());
        c.initialize();
        let r = c.step().expect("step").expect("operational");
        assert!(r.power_shortfall);
        assert!(!r.cooled);
        assert_eq!(r.delivered_watts, 0.0);
        assert_eq!(r.temp_drop_c, 0.0);
        assert_eq!(r.env_temp_c, 45.0);
    }

    #[test]
    fn inactive_cluster_never_cools_and_is_not_a_shortfall() {
        // 9 units on 36 W: 4 W each, below the 5 W start threshold
        let params = ControllerParams {
            power_budget_watts: 36.0,
            ..ControllerParams::default()
        };
        let mut c = controller(SourceType::Grid, 360.0, params);
        assert!(!c.initialize().operational);
        let results = c.run(3, &mut NullSink).expect("run");
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| !r.cooled && !r.power_shortfall));
    }

    #[test]
    fn temperature_recovers_after_sunset() {
        // solar falls from 1000 W at 17:00 to zero at 18:00
        let config = SimConfig::new(12, 600.0, 17.0, 42).expect("valid config");
        let source = PowerSource::new(SourceType::Solar, 6000.0).expect("valid source");
        let mut c = Controller::new(config, strong_params(), source).expect("valid controller");
        c.initialize();
        let results = c.run(12, &mut NullSink).expect("run");

        assert!(results[0].cooled);
        assert!(results[6..].iter().all(|r| r.power_shortfall && r.source_watts == 0.0));
        let min = results.iter().map(|r| r.env_temp_c).fold(f64::INFINITY, f64::min);
        let last = results.last().expect("twelve results").env_temp_c;
        assert!(min < 45.0);
        assert!(last > min);
        assert!(last <= 45.0);
    }

    #[test]
    fn battery_source_is_limited_by_ledger() {
        let params = ControllerParams {
            power_budget_watts: 360.0,
            battery_capacity_wh: 1.0,
            battery_initial_wh: 1.0,
            ..ControllerParams::default()
        };
        let mut c = controller(SourceType::Battery, 360.0, params);
        c.initialize();
        // 360 W for 10 s is exactly 1 Wh
        let first = c.step().expect("step").expect("operational");
        assert!(first.cooled);
        assert!((first.delivered_watts - 360.0).abs() < 1e-9);
        assert!(first.battery_level_wh.abs() < 1e-9);

        let second = c.step().expect("step").expect("operational");
        assert!(second.power_shortfall);
        assert_eq!(second.delivered_watts, 0.0);
    }

    #[test]
    fn generation_surplus_charges_ledger() {
        let params = ControllerParams {
            battery_capacity_wh: 100.0,
            ..ControllerParams::default()
        };
        let mut c = controller(SourceType::Grid, 720.0, params);
        c.initialize();
        let r = c.step().expect("step").expect("operational");
        assert_eq!(r.delivered_watts, 360.0);
        assert_eq!(r.stored_watts, 360.0);
        assert!((r.battery_level_wh - 1.0).abs() < 1e-9);
    }

    #[test]
    fn random_piston_is_seeded_and_bounded() {
        let params = || ControllerParams {
            power_budget_watts: 90.0,
            piston: PistonDrive::Random,
            ..ControllerParams::default()
        };
        let mut a = controller(SourceType::Piston, 90.0, params());
        let mut b = controller(SourceType::Piston, 90.0, params());
        a.initialize();
        b.initialize();
        let ra = a.run(20, &mut NullSink).expect("run");
        let rb = b.run(20, &mut NullSink).expect("run");
        assert_eq!(ra, rb);
        assert!(
            ra.iter()
                .all(|r| (PISTON_IMPULSE_MIN..=PISTON_IMPULSE_MAX).contains(&r.drive_rate))
        );
    }

    #[test]
    fn run_publishes_every_report_interval() {
        let mut c = controller(SourceType::Grid, 360.0, ControllerParams::default());
        c.config.report_every = 3;
        c.initialize();
        let mut sink = MemorySink::default();
        c.run(10, &mut sink).expect("run");
        let ticks: Vec<usize> = sink.published.iter().map(|s| s.ticks_completed).collect();
        assert_eq!(ticks, vec![3, 6, 9]);
    }

    #[test]
    fn shutdown_is_idempotent_and_stops_ticks() {
        let mut c = controller(SourceType::Grid, 360.0, ControllerParams::default());
        c.initialize();
        c.run(2, &mut NullSink).expect("run");
        assert!(c.shutdown());
        assert!(!c.shutdown());
        assert!(!c.status().operational);
        assert!(!c.status().cluster_status.operational);
        assert!(c.run(5, &mut NullSink).expect("run").is_empty());
        assert_eq!(c.ticks_completed(), 2);
    }

    #[test]
    fn huge_tick_request_stops_with_the_controller() {
        let mut idle = controller(SourceType::Grid, 360.0, ControllerParams::default());
        assert!(idle.run(usize::MAX, &mut NullSink).expect("run").is_empty());

        let mut c = controller(SourceType::Grid, 360.0, ControllerParams::default());
        c.initialize();
        c.run(4, &mut NullSink).expect("run");
        c.shutdown();
        assert!(c.run(usize::MAX, &mut NullSink).expect("run").is_empty());
        assert_eq!(c.ticks_completed(), 4);
    }

    #[test]
    fn status_reflects_components() {
        let mut c = controller(SourceType::Grid, 360.0, ControllerParams::default());
        c.initialize();
        let s = c.status();
        assert_eq!(s.cluster_id, "cryocore");
        assert!(s.operational);
        assert_eq!(s.ambient_temp_c, 45.0);
        assert_eq!(s.source_type, "grid");
        assert_eq!(s.cluster_status.unit_statuses.len(), 9);
        assert_eq!(s.environment.air_volume_m3, 144.12);
        assert_eq!(s, c.status());
    }
}
