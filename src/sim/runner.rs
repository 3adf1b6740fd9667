use tracing::info;

use crate::engine::{
    tick_in_order, DiagnosticsSink, EngineHost, RegimeState, ThrustSimulationEngine,
};

use super::event::{default_detectors, EventDetector, SimEvent};
use super::vessel::Vessel;

// ---------------------------------------------------------------------------
// Tick record
// ---------------------------------------------------------------------------

/// Vessel and engine state at the end of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    pub ut: f64,
    pub dt: f64,
    pub warp_index: usize,
    pub regimes: Vec<RegimeState>,
    pub mass: f64,
    pub throttle: f64,
    /// Impulse applied by the engines this tick (warp only), m/s.
    pub delta_v: f64,
    pub periapsis_altitude: f64,
    pub apoapsis_altitude: f64,
}

impl TickRecord {
    fn capture(
        vessel: &Vessel,
        dt: f64,
        warp_index: usize,
        regimes: Vec<RegimeState>,
        delta_v: f64,
    ) -> Self {
        Self {
            ut: vessel.ut(),
            dt,
            warp_index,
            regimes,
            mass: vessel.total_mass(),
            throttle: vessel.throttle,
            delta_v,
            periapsis_altitude: vessel.periapsis_altitude(),
            apoapsis_altitude: vessel.apoapsis_altitude(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Real-time lead-in, a warp block, then a real-time tail.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub throttle: f64,
    pub realtime_ticks: usize,
    pub warp_index: usize,
    pub warp_ticks: usize,
    pub tail_ticks: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            throttle: 1.0,
            realtime_ticks: 50,
            warp_index: 6,
            warp_ticks: 500,
            tail_ticks: 5,
        }
    }
}

impl Schedule {
    pub fn total_ticks(&self) -> usize {
        self.realtime_ticks + self.warp_ticks + self.tail_ticks
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub records: Vec<TickRecord>,
    pub events: Vec<SimEvent>,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Run a schedule with the default event detectors.
pub fn run(
    vessel: &mut Vessel,
    engines: &mut [ThrustSimulationEngine],
    schedule: &Schedule,
    diagnostics: &mut dyn DiagnosticsSink,
) -> RunLog {
    let mut detectors = default_detectors();
    run_with(vessel, engines, schedule, diagnostics, &mut detectors)
}

/// Tick the vessel through the schedule.
///
/// Warp is requested once, when the warp block starts; if an engine drops the
/// vessel back to real time the block continues at real time.
pub fn run_with(
    vessel: &mut Vessel,
    engines: &mut [ThrustSimulationEngine],
    schedule: &Schedule,
    diagnostics: &mut dyn DiagnosticsSink,
    detectors: &mut [Box<dyn EventDetector>],
) -> RunLog {
    let mut log = RunLog {
        records: Vec::with_capacity(schedule.total_ticks() + 1),
        events: vec![],
    };
    vessel.set_throttle(schedule.throttle);

    let initial = vec![RegimeState::Realtime; engines.len()];
    let mut prev = TickRecord::capture(vessel, 0.0, vessel.warp.index, initial, 0.0);
    log.records.push(prev.clone());

    let warp_start = schedule.realtime_ticks;
    let warp_end = warp_start + schedule.warp_ticks;

    for tick in 0..schedule.total_ticks() {
        if tick == warp_start && schedule.warp_ticks > 0 {
            vessel.set_time_rate(schedule.warp_index, false);
        } else if tick == warp_end {
            vessel.set_time_rate(0, false);
        }

        let dt = vessel.time_step();
        let warp_index = vessel.warp.index;
        let reports = tick_in_order(engines, vessel, diagnostics);
        vessel.advance();

        let delta_v: f64 = reports
            .iter()
            .filter_map(|r| r.burn.as_ref())
            .filter(|b| b.applied())
            .map(|b| b.result.delta_v.norm())
            .sum();
        let regimes = reports.iter().map(|r| r.regime).collect();
        let current = TickRecord::capture(vessel, dt, warp_index, regimes, delta_v);

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &current) {
                info!(ut = current.ut, ?kind, "event");
                log.events.push(SimEvent { ut: current.ut, kind });
            }
        }

        log.records.push(current.clone());
        prev = current;
    }

    log
}
