use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use persistent_thrust::config::{load_resource_library, load_scenario};
use persistent_thrust::engine::{EngineHost, TracingDiagnostics};
use persistent_thrust::io::{csv, json};
use persistent_thrust::sim::event::{default_detectors, PeriapsisDetector};
use persistent_thrust::sim::{self, presets, Schedule, Vessel};
use persistent_thrust::ResourceLibrary;

#[derive(Parser, Debug)]
#[command(name = "persistent-thrust")]
#[command(about = "Burn low-thrust engines through real time and time warp")]
struct Args {
    /// Scenario TOML (vessel + engines). Defaults to the built-in ion probe.
    #[arg(long, alias = "scenario")]
    config: Option<PathBuf>,

    /// Built-in scenario when --config is not given: "ion-probe" or "twin-tug"
    #[arg(long, default_value = "ion-probe")]
    preset: String,

    /// Resource density table TOML. Defaults to the stock table.
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Commanded throttle in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    throttle: f64,

    #[arg(long, default_value_t = 50)]
    realtime_ticks: usize,

    /// Time-warp rate index (0 = real time)
    #[arg(long, default_value_t = 6)]
    warp_index: usize,

    /// Ticks spent under warp
    #[arg(long = "ticks", alias = "warp-ticks", default_value_t = 500)]
    warp_ticks: usize,

    #[arg(long, default_value_t = 5)]
    tail_ticks: usize,

    /// Report when periapsis altitude first rises above this many metres
    #[arg(long)]
    target_periapsis: Option<f64>,

    /// Write the tick log as CSV
    #[arg(long)]
    csv: Option<String>,

    /// Write the run summary as JSON
    #[arg(long)]
    json: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("persistent_thrust=info")),
        )
        .init();

    let args = Args::parse();

    let library = match &args.resources {
        Some(path) => load_resource_library(path)?,
        None => ResourceLibrary::stock(),
    };
    let scenario = match &args.config {
        Some(path) => load_scenario(path)?,
        None => match args.preset.as_str() {
            "twin-tug" => presets::twin_tug(),
            "ion-probe" => presets::ion_probe(),
            other => return Err(format!("unknown preset '{other}'").into()),
        },
    };

    let (mut vessel, mut engines) = Vessel::from_scenario(&scenario, &library)?;
    let schedule = Schedule {
        throttle: args.throttle,
        realtime_ticks: args.realtime_ticks,
        warp_index: args.warp_index,
        warp_ticks: args.warp_ticks,
        tail_ticks: args.tail_ticks,
    };

    tracing::info!(vessel = %vessel.name, engines = engines.len(), "starting run");
    let mut diagnostics = TracingDiagnostics;
    let mut detectors = default_detectors();
    if let Some(altitude) = args.target_periapsis {
        detectors.push(Box::new(PeriapsisDetector::new(altitude)));
    }
    let log = sim::run_with(
        &mut vessel,
        &mut engines,
        &schedule,
        &mut diagnostics,
        &mut detectors,
    );
    let summary = json::BurnSummary::from_run(&vessel, &log);

    print_report(&vessel, &engines, &summary);

    if let Some(path) = &args.csv {
        csv::write_tick_log_file(path, &log.records)?;
        tracing::info!(path = %path, "wrote tick log");
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &summary)?;
        tracing::info!(path = %path, "wrote summary");
    }

    Ok(())
}

fn print_report(
    vessel: &Vessel,
    engines: &[persistent_thrust::ThrustSimulationEngine],
    summary: &json::BurnSummary,
) {
    println!();
    println!("====================================================================");
    println!("  PERSISTENT THRUST: {} around {}", vessel.name, vessel.body.name);
    println!("====================================================================");
    println!();
    println!("  Engines");
    println!("  ──────────────────────────────────────────────────────────────────");
    for (engine, mount) in engines.iter().zip(&vessel.mounts) {
        let shown = engine.display();
        println!(
            "  {:<12} {:<28} thrust {:>8.3}  Isp {:>7.1} s  throttle {:>4.0}%",
            mount.name,
            engine.mixture().names(),
            shown.thrust,
            shown.isp,
            shown.throttle * 100.0,
        );
    }
    println!();
    println!("  Run Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Ticks:         {:>10}   (warp {})", summary.ticks, summary.warp_ticks);
    println!("  Elapsed:       {:>10.1} s", summary.elapsed_s);
    println!("  Delta-v:       {:>10.3} m/s", summary.total_delta_v_ms);
    println!(
        "  Mass:          {:>10.4} -> {:.4} (used {:.4})",
        summary.initial_mass, summary.final_mass, summary.mass_used
    );
    println!(
        "  Periapsis:     {:>10.0} m   Apoapsis: {:.0} m",
        summary.final_periapsis_alt_m, summary.final_apoapsis_alt_m
    );
    println!("  Situation:     {:>10}", format!("{:?}", vessel.situation()));
    println!();
    if !summary.events.is_empty() {
        println!("  Events");
        println!("  ──────────────────────────────────────────────────────────────────");
        for e in &summary.events {
            println!("  {}", e);
        }
        println!();
    }
    println!("====================================================================");
    println!();
}
