pub mod event;
pub mod presets;
pub mod runner;
pub mod vessel;

pub use event::{EventDetector, EventKind, SimEvent};
pub use runner::{run, run_with, RunLog, Schedule, TickRecord};
pub use vessel::{EngineMount, Orientation, Tank, TankSet, TimeWarp, Vessel};
