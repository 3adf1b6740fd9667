use nalgebra::Vector3;

/// Keplerian shape of an orbit: size, eccentricity, orientation of the plane.
#[derive(Debug, Clone, Copy)]
pub struct KeplerianElements {
    pub sma: f64,  // semi-major axis, m (negative for hyperbolic)
    pub ecc: f64,
    pub inc: f64,  // rad
}

impl KeplerianElements {
    pub fn from_state_vector(pos: &Vector3<f64>, vel: &Vector3<f64>, mu: f64) -> Self {
        let r = pos.norm();
        let v = vel.norm();

        let h = pos.cross(vel);
        let h_mag = h.norm();

        let e_vec = ((v * v - mu / r) * pos - pos.dot(vel) * vel) / mu;
        let ecc = e_vec.norm();

        // Specific orbital energy
        let energy = 0.5 * v * v - mu / r;
        let sma = -mu / (2.0 * energy);

        let inc = if h_mag > 0.0 {
            (h.z / h_mag).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        KeplerianElements { sma, ecc, inc }
    }

    /// Closest approach to the body centre, m.
    pub fn periapsis_radius(&self) -> f64 {
        self.sma * (1.0 - self.ecc)
    }

    /// Farthest distance from the body centre; infinite for open orbits.
    pub fn apoapsis_radius(&self) -> f64 {
        if self.ecc < 1.0 {
            self.sma * (1.0 + self.ecc)
        } else {
            f64::INFINITY
        }
    }

    pub fn is_bound(&self) -> bool {
        self.ecc < 1.0
    }

    pub fn period(&self, mu: f64) -> f64 {
        if self.is_bound() {
            2.0 * std::f64::consts::PI * (self.sma.powi(3) / mu).sqrt()
        } else {
            f64::INFINITY
        }
    }
}
