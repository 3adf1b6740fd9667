use nalgebra::Vector3;

use super::diagnostics::Diagnostic;

/// Index of an engine on its vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EngineId(pub usize);

/// Flight situation as reported by the host. Only `Suborbital` changes engine behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Situation {
    Landed,
    Flying,
    Suborbital,
    Orbiting,
    Escaping,
}

/// Per-engine values the host computes in real time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineReadout {
    pub isp: f64,                  // s
    pub thrust: f64,               // realized thrust at the current throttle
    pub direction: Vector3<f64>,   // unit thrust vector
}

/// Propellant pool shared by every engine on a vessel.
///
/// Grants are first-requested, first-served: `0 <= granted <= amount`, and a
/// request made after the pool runs dry gets a partial or zero grant.
pub trait ResourcePool {
    fn request_resource(&mut self, propellant: &str, amount: f64) -> f64;
}

/// Receives user-facing warnings.
pub trait DiagnosticsSink {
    fn warn(&mut self, diagnostic: Diagnostic);
}

/// Narrow capability interface the engine needs from its host simulation.
///
/// Implement this to plug the engine into a simulation loop. All calls are
/// synchronous and happen inside one tick.
pub trait EngineHost {
    /// Total vessel mass, same mass unit as propellant density * amount.
    fn total_mass(&self) -> f64;
    fn is_time_accelerated(&self) -> bool;
    fn situation(&self) -> Situation;
    fn universal_time(&self) -> f64;
    /// Simulated time covered by this tick.
    fn time_step(&self) -> f64;

    fn engine_readout(&self, engine: EngineId) -> EngineReadout;

    /// Commanded throttle in [0, 1].
    fn throttle(&self) -> f64;
    fn set_throttle(&mut self, throttle: f64);

    /// Rate index 0 is real time.
    fn set_time_rate(&mut self, rate_index: usize, immediate: bool);

    /// Apply an impulsive velocity change to the vessel orbit.
    fn perturb_orbit(&mut self, delta_v: Vector3<f64>, at_time: f64, over_duration: f64);

    fn resources(&mut self) -> &mut dyn ResourcePool;
}
