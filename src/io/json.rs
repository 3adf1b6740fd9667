use std::io::{self, Write};

use serde::Serialize;

use crate::sim::{RunLog, Vessel};

/// Summary statistics computed from a run.
#[derive(Debug, Clone, Serialize)]
pub struct BurnSummary {
    pub vessel: String,
    pub engines: usize,
    pub ticks: usize,
    pub warp_ticks: usize,
    pub elapsed_s: f64,
    pub total_delta_v_ms: f64,
    pub initial_mass: f64,
    pub final_mass: f64,
    pub mass_used: f64,
    pub final_periapsis_alt_m: f64,
    pub final_apoapsis_alt_m: f64,
    pub events: Vec<String>,
}

impl BurnSummary {
    pub fn from_run(vessel: &Vessel, log: &RunLog) -> Self {
        let (first, last) = match (log.records.first(), log.records.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return BurnSummary {
                    vessel: vessel.name.clone(),
                    engines: vessel.mounts.len(),
                    ticks: 0,
                    warp_ticks: 0,
                    elapsed_s: 0.0,
                    total_delta_v_ms: 0.0,
                    initial_mass: 0.0,
                    final_mass: 0.0,
                    mass_used: 0.0,
                    final_periapsis_alt_m: vessel.periapsis_altitude(),
                    final_apoapsis_alt_m: vessel.apoapsis_altitude(),
                    events: vec![],
                }
            }
        };

        BurnSummary {
            vessel: vessel.name.clone(),
            engines: vessel.mounts.len(),
            ticks: log.records.len().saturating_sub(1),
            warp_ticks: log.records.iter().skip(1).filter(|r| r.warp_index > 0).count(),
            elapsed_s: last.ut - first.ut,
            total_delta_v_ms: log.records.iter().map(|r| r.delta_v).sum(),
            initial_mass: first.mass,
            final_mass: last.mass,
            mass_used: first.mass - last.mass,
            final_periapsis_alt_m: last.periapsis_altitude,
            final_apoapsis_alt_m: last.apoapsis_altitude,
            events: log
                .events
                .iter()
                .map(|e| format!("{:.1}s {:?}", e.ut, e.kind))
                .collect(),
        }
    }
}

/// Write a burn summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &BurnSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

pub fn write_summary_file(path: &str, summary: &BurnSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
