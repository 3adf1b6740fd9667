use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::propulsion::DemandVector;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Isp-to-exhaust-velocity constant, m/s^2.
pub const ISP_G0: f64 = 9.81;

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Values captured on each real-time tick and replayed during warp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineSnapshot {
    pub thrust: f64,
    pub isp: f64,       // s
    pub throttle: f64,  // [0, 1]
}

impl EngineSnapshot {
    /// Propellant mass flow rate: mdot = F / (Isp * g0). Zero for a non-positive thrust or Isp.
    pub fn mass_flow(&self) -> f64 {
        if self.thrust > 0.0 && self.isp > 0.0 {
            self.thrust / (self.isp * ISP_G0)
        } else {
            0.0
        }
    }

    /// Effective exhaust velocity.
    pub fn exhaust_velocity(&self) -> f64 {
        self.isp * ISP_G0
    }
}

/// Read-only (thrust, Isp, throttle) triple published once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplaySnapshot {
    pub thrust: f64,
    pub isp: f64,
    pub throttle: f64,
}

impl From<EngineSnapshot> for DisplaySnapshot {
    fn from(s: EngineSnapshot) -> Self {
        Self { thrust: s.thrust, isp: s.isp, throttle: s.throttle }
    }
}

/// Everything that must survive a save/load cycle, restored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub throttle: f64,
    pub thrust: f64,
    pub isp: f64,
    pub warp_to_real: bool,
}

// ---------------------------------------------------------------------------
// Regime
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegimeState {
    #[default]
    Realtime,
    /// First real-time tick after warp: throttle restored, snapshot left alone.
    WarpTransitionPending,
    WarpPerturbing,
    SuborbitalBlocked,
    Depleted,
}

// ---------------------------------------------------------------------------
// Per-tick results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationResult {
    pub delta_v: Vector3<f64>,
    pub depleted: bool,
}

/// Why a warp tick did not perturb the orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing flows: zero thrust, zero Isp or an empty time step.
    NoMassFlow,
    /// Mixture has no mass-bearing propellant.
    NoReactionMass,
    /// An accounted propellant was requested and nothing was granted.
    PropellantDepleted,
    /// Burn would consume the whole vessel.
    MassExhausted,
}

/// Warp-tick burn details.
#[derive(Debug, Clone, PartialEq)]
pub struct WarpBurn {
    pub ut: f64,
    pub dt: f64,
    pub initial_mass: f64,
    pub mass_flow: f64,
    /// Reaction mass burned over `dt`.
    pub dm: f64,
    /// Resource units requested per propellant (zero where accounting is off).
    pub requested: DemandVector,
    pub granted: DemandVector,
    pub result: PerturbationResult,
    pub skipped: Option<SkipReason>,
}

impl WarpBurn {
    pub fn applied(&self) -> bool {
        self.skipped.is_none()
    }
}

/// Outcome of one engine tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub regime: RegimeState,
    pub burn: Option<WarpBurn>,
    pub display: DisplaySnapshot,
}
