//! Persistent low-thrust propulsion.
//!
//! Engines record thrust, Isp and throttle while the host runs in real time,
//! then replace the host's per-tick burn with one analytic impulse per tick
//! under time acceleration, drawing multi-propellant mixtures from a shared pool.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod orbital;
pub mod propulsion;
pub mod sim;

pub use engine::{
    Accounting, DiagnosticsSink, EngineHost, EngineId, RegimeState, ThrustSimulationEngine,
    TickReport,
};
pub use error::{Error, Result};
pub use propulsion::{PropellantMixture, ResourceLibrary};
