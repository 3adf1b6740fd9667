use nalgebra::Vector3;

use super::body::CentralBody;
use super::elements::KeplerianElements;

/// Point-mass orbit about a single body, advanced with fixed-step RK4.
#[derive(Debug, Clone)]
pub struct TwoBodyOrbit {
    pub epoch: f64,          // s, universal time of `pos` / `vel`
    pub pos: Vector3<f64>,   // m, body-centred inertial
    pub vel: Vector3<f64>,   // m/s
    pub mu: f64,
}

/// Largest RK4 sub-step when propagating, s.
pub const MAX_PROPAGATION_STEP: f64 = 10.0;

impl TwoBodyOrbit {
    /// Prograde circular equatorial orbit at `altitude` above the surface.
    pub fn circular(body: &CentralBody, altitude: f64, epoch: f64) -> Self {
        let r = body.radius + altitude;
        Self {
            epoch,
            pos: Vector3::new(r, 0.0, 0.0),
            vel: Vector3::new(0.0, body.circular_velocity(r), 0.0),
            mu: body.mu,
        }
    }

    pub fn elements(&self) -> KeplerianElements {
        KeplerianElements::from_state_vector(&self.pos, &self.vel, self.mu)
    }

    pub fn prograde(&self) -> Vector3<f64> {
        self.vel.normalize()
    }

    fn accel(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let r = pos.norm();
        if r < 1.0 {
            return Vector3::zeros();
        }
        -self.mu / (r * r * r) * pos
    }

    fn rk4_step(&mut self, dt: f64) {
        let (p, v) = (self.pos, self.vel);
        let k1_dr = v;
        let k1_dv = self.accel(&p);
        let k2_dr = v + k1_dv * dt * 0.5;
        let k2_dv = self.accel(&(p + k1_dr * dt * 0.5));
        let k3_dr = v + k2_dv * dt * 0.5;
        let k3_dv = self.accel(&(p + k2_dr * dt * 0.5));
        let k4_dr = v + k3_dv * dt;
        let k4_dv = self.accel(&(p + k3_dr * dt));

        self.pos = p + (k1_dr + 2.0 * k2_dr + 2.0 * k3_dr + k4_dr) * (dt / 6.0);
        self.vel = v + (k1_dv + 2.0 * k2_dv + 2.0 * k3_dv + k4_dv) * (dt / 6.0);
        self.epoch += dt;
    }

    /// Advance to universal time `ut`. Times before the epoch are ignored.
    pub fn propagate_to(&mut self, ut: f64) {
        let span = ut - self.epoch;
        if span <= 0.0 {
            return;
        }
        let n = (span / MAX_PROPAGATION_STEP).ceil().max(1.0) as usize;
        let dt = span / n as f64;
        for _ in 0..n {
            self.rk4_step(dt);
        }
        self.epoch = ut;
    }

    /// Impulsive velocity change at `ut`.
    pub fn perturb(&mut self, delta_v: Vector3<f64>, ut: f64) {
        self.propagate_to(ut);
        self.vel += delta_v;
    }
}
