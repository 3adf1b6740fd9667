use std::collections::BTreeMap;

use nalgebra::Vector3;

use crate::config::ScenarioConfig;
use crate::engine::{
    EngineHost, EngineId, EngineReadout, ResourcePool, Situation, ThrustSimulationEngine, ISP_G0,
};
use crate::error::{Error, Result};
use crate::orbital::{CentralBody, TwoBodyOrbit};
use crate::propulsion::{demand, PropellantMixture, ResourceLibrary};

// ---------------------------------------------------------------------------
// Tanks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tank {
    pub amount: f64,
    pub density: f64,
}

/// Vessel-wide propellant pool. Grants whatever is left, in call order.
#[derive(Debug, Clone, Default)]
pub struct TankSet {
    tanks: BTreeMap<String, Tank>,
}

impl TankSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, resource: impl Into<String>, amount: f64, density: f64) {
        let tank = self.tanks.entry(resource.into()).or_insert(Tank { amount: 0.0, density });
        tank.amount += amount.max(0.0);
    }

    pub fn amount(&self, resource: &str) -> f64 {
        self.tanks.get(resource).map(|t| t.amount).unwrap_or(0.0)
    }

    /// Mass of everything in the tanks.
    pub fn mass(&self) -> f64 {
        self.tanks.values().map(|t| t.amount * t.density).sum()
    }
}

impl ResourcePool for TankSet {
    fn request_resource(&mut self, propellant: &str, amount: f64) -> f64 {
        if !(amount > 0.0) {
            return 0.0;
        }
        match self.tanks.get_mut(propellant) {
            Some(tank) => {
                let granted = amount.min(tank.amount);
                tank.amount -= granted;
                granted
            }
            None => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Time warp
// ---------------------------------------------------------------------------

/// Rate table; index 0 is real time.
#[derive(Debug, Clone)]
pub struct TimeWarp {
    pub rates: Vec<f64>,
    pub index: usize,
}

impl Default for TimeWarp {
    fn default() -> Self {
        Self {
            rates: vec![1.0, 5.0, 10.0, 50.0, 100.0, 1_000.0, 10_000.0, 100_000.0],
            index: 0,
        }
    }
}

impl TimeWarp {
    pub fn rate(&self) -> f64 {
        self.rates.get(self.index).copied().unwrap_or(1.0)
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.rates.len().saturating_sub(1));
    }

    pub fn is_accelerated(&self) -> bool {
        self.index > 0
    }
}

// ---------------------------------------------------------------------------
// Engine mounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Prograde,
    Retrograde,
    Fixed(Vector3<f64>),
}

/// Host-side view of an engine: what it produces at full throttle and where it points.
#[derive(Debug, Clone)]
pub struct EngineMount {
    pub name: String,
    pub max_thrust: f64,
    pub isp: f64,
    pub orientation: Orientation,
    pub mixture: PropellantMixture,
    flameout: bool,
}

impl EngineMount {
    pub fn new(
        name: impl Into<String>,
        max_thrust: f64,
        isp: f64,
        mixture: PropellantMixture,
    ) -> Self {
        Self {
            name: name.into(),
            max_thrust,
            isp,
            orientation: Orientation::Prograde,
            mixture,
            flameout: false,
        }
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn flameout(&self) -> bool {
        self.flameout
    }
}

// ---------------------------------------------------------------------------
// Vessel
// ---------------------------------------------------------------------------

/// In-memory host: one vessel on a two-body orbit with a shared propellant pool.
///
/// In real time it integrates its own burn every fixed step, the way a
/// physics engine would; under warp it leaves propulsion to the engines.
#[derive(Debug, Clone)]
pub struct Vessel {
    pub name: String,
    pub dry_mass: f64,
    pub tanks: TankSet,
    pub body: CentralBody,
    pub orbit: TwoBodyOrbit,
    pub warp: TimeWarp,
    pub fixed_dt: f64,
    pub throttle: f64,
    pub mounts: Vec<EngineMount>,
}

impl Vessel {
    pub fn new(name: impl Into<String>, dry_mass: f64, body: CentralBody, altitude: f64) -> Self {
        let orbit = TwoBodyOrbit::circular(&body, altitude, 0.0);
        Self {
            name: name.into(),
            dry_mass,
            tanks: TankSet::new(),
            body,
            orbit,
            warp: TimeWarp::default(),
            fixed_dt: 0.02,
            throttle: 0.0,
            mounts: vec![],
        }
    }

    /// Build a vessel and its engines, in tick order, from a scenario.
    pub fn from_scenario(
        scenario: &ScenarioConfig,
        library: &ResourceLibrary,
    ) -> Result<(Vessel, Vec<ThrustSimulationEngine>)> {
        let v = &scenario.vessel;
        let body = CentralBody::by_name(&v.body).ok_or_else(|| Error::UnknownBody(v.body.clone()))?;
        let mut vessel = Vessel::new(&v.name, v.dry_mass, body, v.altitude);
        for tank in &v.tanks {
            let density = library
                .density(&tank.resource)
                .ok_or_else(|| Error::UnknownResource(tank.resource.clone()))?;
            vessel.tanks.fill(&tank.resource, tank.amount, density);
        }

        let mut engines = Vec::with_capacity(scenario.engines.len());
        for (idx, cfg) in scenario.engines.iter().enumerate() {
            let engine = ThrustSimulationEngine::from_config(EngineId(idx), cfg, library)?;
            vessel.mounts.push(EngineMount::new(
                &cfg.name,
                cfg.max_thrust,
                cfg.isp,
                engine.mixture().clone(),
            ));
            engines.push(engine);
        }
        Ok((vessel, engines))
    }

    pub fn ut(&self) -> f64 {
        self.orbit.epoch
    }

    pub fn periapsis_altitude(&self) -> f64 {
        self.orbit.elements().periapsis_radius() - self.body.radius
    }

    pub fn apoapsis_altitude(&self) -> f64 {
        self.orbit.elements().apoapsis_radius() - self.body.radius
    }

    fn direction(&self, orientation: Orientation) -> Vector3<f64> {
        match orientation {
            Orientation::Prograde => self.orbit.prograde(),
            Orientation::Retrograde => -self.orbit.prograde(),
            Orientation::Fixed(v) => v.normalize(),
        }
    }

    /// One fixed real-time step of every firing engine: drain tanks, push the orbit.
    fn realtime_burn(&mut self) {
        let dt = self.fixed_dt;
        for idx in 0..self.mounts.len() {
            let mount = &self.mounts[idx];
            let thrust = mount.max_thrust * self.throttle;
            if thrust <= 0.0 || mount.isp <= 0.0 || !mount.mixture.has_reaction_mass() {
                continue;
            }
            let dm = thrust / (mount.isp * ISP_G0) * dt;
            let units = demand(dm / mount.mixture.average_density(), &mount.mixture);

            let mut starved = false;
            for (p, &amount) in mount.mixture.propellants().iter().zip(units.amounts()) {
                if amount > 0.0 && self.tanks.request_resource(&p.name, amount) == 0.0 {
                    starved = true;
                }
            }

            let mass = self.total_mass();
            let direction = self.direction(mount.orientation);
            self.mounts[idx].flameout = starved;
            if !starved && mass > 0.0 {
                self.orbit.vel += direction * (thrust / mass * dt);
            }
        }
    }

    /// Close the tick: burn if in real time, then move the clock and the orbit.
    pub fn advance(&mut self) {
        if !self.warp.is_accelerated() {
            self.realtime_burn();
        }
        let ut = self.ut() + self.time_step();
        self.orbit.propagate_to(ut);
    }
}

impl EngineHost for Vessel {
    fn total_mass(&self) -> f64 {
        self.dry_mass + self.tanks.mass()
    }

    fn is_time_accelerated(&self) -> bool {
        self.warp.is_accelerated()
    }

    fn situation(&self) -> Situation {
        let el = self.orbit.elements();
        if el.periapsis_radius() < self.body.radius {
            Situation::Suborbital
        } else if !el.is_bound() {
            Situation::Escaping
        } else {
            Situation::Orbiting
        }
    }

    fn universal_time(&self) -> f64 {
        self.ut()
    }

    fn time_step(&self) -> f64 {
        self.fixed_dt * self.warp.rate()
    }

    fn engine_readout(&self, engine: EngineId) -> EngineReadout {
        match self.mounts.get(engine.0) {
            Some(m) => EngineReadout {
                isp: m.isp,
                thrust: if m.flameout { 0.0 } else { m.max_thrust * self.throttle },
                direction: self.direction(m.orientation),
            },
            None => EngineReadout { isp: 0.0, thrust: 0.0, direction: Vector3::zeros() },
        }
    }

    fn throttle(&self) -> f64 {
        self.throttle
    }

    fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    fn set_time_rate(&mut self, rate_index: usize, _immediate: bool) {
        self.warp.set_index(rate_index);
    }

    fn perturb_orbit(&mut self, delta_v: Vector3<f64>, at_time: f64, _over_duration: f64) {
        self.orbit.perturb(delta_v, at_time);
    }

    fn resources(&mut self) -> &mut dyn ResourcePool {
        &mut self.tanks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xenon() -> PropellantMixture {
        PropellantMixture::single("XenonGas", 0.0001).unwrap()
    }

    fn probe() -> Vessel {
        let mut v = Vessel::new("Probe", 0.5, CentralBody::kerbin(), 100_000.0);
        v.tanks.fill("XenonGas", 700.0, 0.0001);
        v.mounts.push(EngineMount::new("ion", 0.002, 4200.0, xenon()));
        v
    }

    #[test]
    fn tanks_grant_what_is_left() {
        let mut tanks = TankSet::new();
        tanks.fill("LiquidFuel", 10.0, 0.005);
        assert_eq!(tanks.request_resource("LiquidFuel", 6.0), 6.0);
        assert_eq!(tanks.request_resource("LiquidFuel", 6.0), 4.0);
        assert_eq!(tanks.request_resource("LiquidFuel", 6.0), 0.0);
        assert_eq!(tanks.request_resource("Oxidizer", 1.0), 0.0);
        assert_eq!(tanks.request_resource("LiquidFuel", -1.0), 0.0);
    }

    #[test]
    fn mass_includes_tanks() {
        let v = probe();
        assert!((v.total_mass() - 0.57).abs() < 1e-12);
    }

    #[test]
    fn warp_index_is_clamped() {
        let mut w = TimeWarp::default();
        w.set_index(99);
        assert_eq!(w.index, 7);
        assert!(w.is_accelerated());
        w.set_index(0);
        assert_eq!(w.rate(), 1.0);
    }

    #[test]
    fn time_step_scales_with_warp() {
        let mut v = probe();
        assert!((v.time_step() - 0.02).abs() < 1e-12);
        v.set_time_rate(4, true);
        assert!((v.time_step() - 2.0).abs() < 1e-12);
        v.advance();
        assert!((v.ut() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn realtime_burn_drains_tanks() {
        let mut v = probe();
        v.throttle = 1.0;
        let before = v.tanks.amount("XenonGas");
        v.advance();
        assert!(v.tanks.amount("XenonGas") < before);
        assert!(v.apoapsis_altitude() > 100_000.0);
    }

    #[test]
    fn warp_leaves_propulsion_to_engines() {
        let mut v = probe();
        v.throttle = 1.0;
        v.set_time_rate(3, true);
        v.advance();
        assert_eq!(v.tanks.amount("XenonGas"), 700.0);
    }

    #[test]
    fn situation_follows_periapsis() {
        let mut v = probe();
        assert_eq!(v.situation(), Situation::Orbiting);
        let retro = -v.orbit.prograde() * 500.0;
        v.perturb_orbit(retro, 0.0, 0.0);
        assert_eq!(v.situation(), Situation::Suborbital);
    }

    #[test]
    fn readout_scales_with_throttle() {
        let mut v = probe();
        v.set_throttle(0.5);
        let r = v.engine_readout(EngineId(0));
        assert!((r.thrust - 0.001).abs() < 1e-12);
        assert_eq!(r.isp, 4200.0);
        assert!((r.direction.norm() - 1.0).abs() < 1e-12);
        assert_eq!(v.engine_readout(EngineId(5)).thrust, 0.0);
    }
}
