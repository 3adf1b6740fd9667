use std::io::{self, Write};

use crate::sim::TickRecord;

/// Write the tick log in CSV format.
///
/// Columns: ut, dt, warp_index, mass, throttle, delta_v,
///          periapsis_alt, apoapsis_alt, regimes (engine regimes joined by `;`)
pub fn write_tick_log<W: Write>(writer: &mut W, records: &[TickRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "ut,dt,warp_index,mass,throttle,delta_v,periapsis_alt,apoapsis_alt,regimes"
    )?;

    for r in records {
        let regimes = r
            .regimes
            .iter()
            .map(|g| format!("{:?}", g))
            .collect::<Vec<_>>()
            .join(";");
        writeln!(
            writer,
            "{:.3},{:.3},{},{:.6},{:.3},{:.6},{:.1},{:.1},{}",
            r.ut,
            r.dt,
            r.warp_index,
            r.mass,
            r.throttle,
            r.delta_v,
            r.periapsis_altitude,
            r.apoapsis_altitude,
            regimes,
        )?;
    }

    Ok(())
}

/// Write the tick log to a CSV file.
pub fn write_tick_log_file(path: &str, records: &[TickRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_tick_log(&mut file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RegimeState;

    #[test]
    fn csv_has_header_and_rows() {
        let records = vec![TickRecord {
            ut: 12.5,
            dt: 20.0,
            warp_index: 5,
            regimes: vec![RegimeState::WarpPerturbing, RegimeState::Depleted],
            mass: 0.57,
            throttle: 1.0,
            delta_v: 0.07,
            periapsis_altitude: 100_000.0,
            apoapsis_altitude: 100_500.0,
        }];
        let mut buf = Vec::new();
        write_tick_log(&mut buf, &records).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ut,dt,warp_index"));
        assert!(lines[1].starts_with("12.500,20.000,5,"));
        assert!(lines[1].ends_with("WarpPerturbing;Depleted"));
    }
}
