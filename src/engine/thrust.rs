use nalgebra::Vector3;
use tracing::{debug, trace};

use super::diagnostics::Diagnostic;
use super::host::{DiagnosticsSink, EngineHost, EngineId, Situation};
use super::state::{
    DisplaySnapshot, EngineSnapshot, PersistedState, PerturbationResult, RegimeState, SkipReason,
    TickReport, WarpBurn,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::propulsion::{
    demand, massless_demand, DemandVector, PropellantMixture, PropellantSpec, ResourceLibrary,
};

/// Which propellants are drawn from the pool during warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accounting {
    pub mass: bool,
    pub massless: bool,
}

impl Default for Accounting {
    fn default() -> Self {
        Self { mass: true, massless: false }
    }
}

impl Accounting {
    fn covers(&self, p: &PropellantSpec) -> bool {
        if p.has_mass() { self.mass } else { self.massless }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Persistent-thrust engine.
///
/// In real time it only records thrust, Isp and throttle; the host integrates
/// the burn itself. Under time acceleration it turns the recorded values into a
/// single Tsiolkovsky impulse per tick, draws the propellant from the shared
/// pool, and hands the impulse to the host orbit.
#[derive(Debug, Clone)]
pub struct ThrustSimulationEngine {
    id: EngineId,
    mixture: PropellantMixture,
    accounting: Accounting,
    snapshot: EngineSnapshot,
    warp_to_real: bool,
    depletion_latched: bool,
    regime: RegimeState,
    display: DisplaySnapshot,
}

impl ThrustSimulationEngine {
    pub fn new(id: EngineId, mixture: PropellantMixture, accounting: Accounting) -> Self {
        Self {
            id,
            mixture,
            accounting,
            snapshot: EngineSnapshot::default(),
            warp_to_real: false,
            depletion_latched: false,
            regime: RegimeState::Realtime,
            display: DisplaySnapshot::default(),
        }
    }

    /// Resolve a load-time configuration into an engine.
    pub fn from_config(
        id: EngineId,
        config: &EngineConfig,
        library: &ResourceLibrary,
    ) -> Result<Self> {
        let mixture = config.mixture(library)?;
        Ok(Self::new(id, mixture, config.accounting()))
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn mixture(&self) -> &PropellantMixture {
        &self.mixture
    }

    pub fn accounting(&self) -> Accounting {
        self.accounting
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot
    }

    /// Regime of the most recent tick.
    pub fn regime(&self) -> RegimeState {
        self.regime
    }

    pub fn display(&self) -> DisplaySnapshot {
        self.display
    }

    pub fn warp_to_real_pending(&self) -> bool {
        self.warp_to_real
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            throttle: self.snapshot.throttle,
            thrust: self.snapshot.thrust,
            isp: self.snapshot.isp,
            warp_to_real: self.warp_to_real,
        }
    }

    pub fn restore(&mut self, state: PersistedState) {
        self.snapshot = EngineSnapshot {
            thrust: state.thrust,
            isp: state.isp,
            throttle: state.throttle,
        };
        self.warp_to_real = state.warp_to_real;
        self.display = self.snapshot.into();
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the engine by one host tick.
    pub fn tick(
        &mut self,
        host: &mut dyn EngineHost,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> TickReport {
        let (regime, burn) = if !host.is_time_accelerated() {
            if self.warp_to_real {
                self.leave_warp(host);
                (RegimeState::WarpTransitionPending, None)
            } else {
                self.refresh_snapshot(host);
                (RegimeState::Realtime, None)
            }
        } else if host.situation() == Situation::Suborbital {
            self.block_suborbital(host, diagnostics);
            (RegimeState::SuborbitalBlocked, None)
        } else {
            let burn = self.warp_burn(host);
            let regime = self.settle(&burn, host, diagnostics);
            (regime, Some(burn))
        };

        if regime != self.regime {
            debug!(engine = self.id.0, from = ?self.regime, to = ?regime, "regime change");
        }
        self.regime = regime;
        self.display = self.snapshot.into();

        TickReport { regime, burn, display: self.display }
    }

    /// Restores the throttle saved before warp. A depletion seen under the
    /// previous warp block is over once the host is back in real time.
    fn leave_warp(&mut self, host: &mut dyn EngineHost) {
        host.set_throttle(self.snapshot.throttle);
        self.warp_to_real = false;
        self.depletion_latched = false;
    }

    fn refresh_snapshot(&mut self, host: &dyn EngineHost) {
        let readout = host.engine_readout(self.id);
        self.snapshot = EngineSnapshot {
            thrust: readout.thrust,
            isp: readout.isp,
            throttle: host.throttle(),
        };
        self.depletion_latched = false;
    }

    fn block_suborbital(
        &mut self,
        host: &mut dyn EngineHost,
        diagnostics: &mut dyn DiagnosticsSink,
    ) {
        if host.throttle() > 0.0 {
            host.set_throttle(0.0);
            diagnostics.warn(Diagnostic::SuborbitalWarpThrust);
        }
    }

    /// Resource units to request per propellant for a blended demand.
    fn requests(&self, demand_mass: f64) -> DemandVector {
        let n = self.mixture.len();
        let mass = if self.accounting.mass {
            demand(demand_mass, &self.mixture)
        } else {
            DemandVector::zeros(n)
        };
        let massless = if self.accounting.massless {
            massless_demand(demand_mass, &self.mixture)
        } else {
            DemandVector::zeros(n)
        };
        mass.merged(&massless)
    }

    fn warp_burn(&mut self, host: &mut dyn EngineHost) -> WarpBurn {
        self.warp_to_real = true;

        let ut = host.universal_time();
        let dt = host.time_step();
        let m0 = host.total_mass();
        let direction = host.engine_readout(self.id).direction;
        let mass_flow = self.snapshot.mass_flow();
        let dm = mass_flow * dt;
        let n = self.mixture.len();

        let mut burn = WarpBurn {
            ut,
            dt,
            initial_mass: m0,
            mass_flow,
            dm,
            requested: DemandVector::zeros(n),
            granted: DemandVector::zeros(n),
            result: PerturbationResult { delta_v: Vector3::zeros(), depleted: false },
            skipped: None,
        };

        if !(dm > 0.0) || !dm.is_finite() {
            burn.skipped = Some(SkipReason::NoMassFlow);
            return burn;
        }
        if !self.mixture.has_reaction_mass() {
            trace!(engine = self.id.0, "no mass-bearing propellant; warp tick is inert");
            burn.skipped = Some(SkipReason::NoReactionMass);
            return burn;
        }

        let demand_mass = dm / self.mixture.average_density();
        burn.requested = self.requests(demand_mass);

        let pool = host.resources();
        for (idx, p) in self.mixture.propellants().iter().enumerate() {
            if !self.accounting.covers(p) {
                continue;
            }
            let amount = burn.requested.get(idx);
            let granted = pool.request_resource(&p.name, amount);
            burn.granted.set(idx, granted);
            trace!(
                engine = self.id.0,
                propellant = %p.name,
                amount,
                granted,
                "resource request"
            );
            if amount > 0.0 && granted == 0.0 {
                burn.result.depleted = true;
            }
        }
        if burn.result.depleted {
            burn.skipped = Some(SkipReason::PropellantDepleted);
            return burn;
        }

        let m1 = m0 - dm;
        if !(m0 > 0.0) || !(m1 > 0.0) {
            burn.result.depleted = true;
            burn.skipped = Some(SkipReason::MassExhausted);
            return burn;
        }

        let delta_v = direction * (self.snapshot.exhaust_velocity() * (m0 / m1).ln());
        if !delta_v.iter().all(|c| c.is_finite()) {
            burn.result.depleted = true;
            burn.skipped = Some(SkipReason::MassExhausted);
            return burn;
        }

        burn.result.delta_v = delta_v;
        host.perturb_orbit(delta_v, ut, dt);
        burn
    }

    /// Regime after a warp tick.
    ///
    /// A depleted tick at zero throttle still reports `WarpPerturbing`: nothing
    /// was applied, but there is no thrust to cut and no rate to force.
    fn settle(
        &mut self,
        burn: &WarpBurn,
        host: &mut dyn EngineHost,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> RegimeState {
        if !burn.result.depleted {
            if burn.applied() {
                self.depletion_latched = false;
            }
            return RegimeState::WarpPerturbing;
        }
        if self.snapshot.throttle <= 0.0 {
            return RegimeState::WarpPerturbing;
        }
        if !self.depletion_latched {
            self.depletion_latched = true;
            host.set_time_rate(0, true);
            diagnostics.warn(Diagnostic::PropellantDepleted);
        }
        RegimeState::Depleted
    }
}

/// Tick every engine on one vessel in slice order.
///
/// Earlier engines draw from the shared pool first; a later engine may get a
/// partial or zero grant for the same tick.
pub fn tick_in_order(
    engines: &mut [ThrustSimulationEngine],
    host: &mut dyn EngineHost,
    diagnostics: &mut dyn DiagnosticsSink,
) -> Vec<TickReport> {
    engines
        .iter_mut()
        .map(|e| e.tick(&mut *host, &mut *diagnostics))
        .collect()
}
