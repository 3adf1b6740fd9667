pub mod demand;
pub mod propellant;

pub use demand::{demand, massless_demand, DemandVector};
pub use propellant::{PropellantMixture, PropellantSpec, ResourceLibrary};
