/// Gravitating body an orbit is referenced to.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralBody {
    pub name: String,
    pub mu: f64,      // m^3/s^2
    pub radius: f64,  // m, equatorial
}

impl CentralBody {
    pub fn kerbin() -> Self {
        Self { name: "Kerbin".into(), mu: 3.531_6e12, radius: 600_000.0 }
    }

    pub fn earth() -> Self {
        Self { name: "Earth".into(), mu: 3.986_004_418e14, radius: 6_378_137.0 }
    }

    /// Case-insensitive preset lookup.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kerbin" => Some(Self::kerbin()),
            "earth" => Some(Self::earth()),
            _ => None,
        }
    }

    /// Circular orbit speed at radius `r`.
    pub fn circular_velocity(&self, r: f64) -> f64 {
        (self.mu / r).sqrt()
    }
}
