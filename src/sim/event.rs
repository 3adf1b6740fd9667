use crate::engine::RegimeState;

use super::runner::TickRecord;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    WarpEntered { rate_index: usize },
    WarpExited,
    Depleted { engine: usize },
    SuborbitalBlocked { engine: usize },
    Custom(String),
}

/// A discrete event seen between two consecutive ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub ut: f64,
    pub kind: EventKind,
}

/// Passive detector over consecutive tick records.
pub trait EventDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind>;
}

/// Warp rate leaving or returning to real time.
pub struct WarpDetector;

impl EventDetector for WarpDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        match (prev.warp_index, current.warp_index) {
            (0, idx) if idx > 0 => Some(EventKind::WarpEntered { rate_index: idx }),
            (p, 0) if p > 0 => Some(EventKind::WarpExited),
            _ => None,
        }
    }
}

/// First engine whose regime moved into `target` this tick.
fn entered(prev: &TickRecord, current: &TickRecord, target: RegimeState) -> Option<usize> {
    current
        .regimes
        .iter()
        .enumerate()
        .find(|&(i, &r)| r == target && prev.regimes.get(i) != Some(&target))
        .map(|(i, _)| i)
}

pub struct DepletionDetector;

impl EventDetector for DepletionDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        entered(prev, current, RegimeState::Depleted).map(|engine| EventKind::Depleted { engine })
    }
}

pub struct SuborbitalDetector;

impl EventDetector for SuborbitalDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        entered(prev, current, RegimeState::SuborbitalBlocked)
            .map(|engine| EventKind::SuborbitalBlocked { engine })
    }
}

/// Fires once when periapsis altitude first rises above a threshold.
pub struct PeriapsisDetector {
    pub altitude: f64,
    fired: bool,
}

impl PeriapsisDetector {
    pub fn new(altitude: f64) -> Self {
        Self { altitude, fired: false }
    }
}

impl EventDetector for PeriapsisDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.periapsis_altitude < self.altitude && current.periapsis_altitude >= self.altitude {
            self.fired = true;
            Some(EventKind::Custom(format!("Periapsis above {:.0} m", self.altitude)))
        } else {
            None
        }
    }
}

pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![Box::new(WarpDetector), Box::new(DepletionDetector), Box::new(SuborbitalDetector)]
}
