pub mod diagnostics;
pub mod host;
pub mod state;
pub mod thrust;

pub use diagnostics::{Diagnostic, RecordingDiagnostics, TracingDiagnostics};
pub use host::{DiagnosticsSink, EngineHost, EngineId, EngineReadout, ResourcePool, Situation};
pub use state::{
    DisplaySnapshot, EngineSnapshot, PersistedState, PerturbationResult, RegimeState, SkipReason,
    TickReport, WarpBurn, ISP_G0,
};
pub use thrust::{tick_in_order, Accounting, ThrustSimulationEngine};
