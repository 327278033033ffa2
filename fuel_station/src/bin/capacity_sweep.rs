//! Capacity sweep
//!
//! Runs the same station (same seed, hence the same arrivals) with 1..=N
//! pumps in parallel and prints one summary line per pump count.
//!
//! Usage:
//!   cargo run --release --bin capacity_sweep -- [max_pumps] [config.toml]

use std::env;

use des::parallel::{ParallelRunner, simple_progress_reporter};
use fuel_station::{RunOutcome, StationConfig, build};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let max_pumps: usize = match args.get(1).map(|s| s.parse::<usize>()) {
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            eprintln!("Usage: {} [max_pumps] [config.toml]", args[0]);
            std::process::exit(1);
        }
        None => 5,
    };
    let base = match args.get(2) {
        Some(path) => StationConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path, e);
            std::process::exit(1);
        }),
        None => StationConfig::seeded(42),
    };

    let config_for = |scenario_id: usize| StationConfig {
        server_capacity: scenario_id + 1,
        record_trace: false,
        ..base.clone()
    };

    println!("=== Capacity sweep: 1..={} pumps ===\n", max_pumps);

    let results = ParallelRunner::new(max_pumps, |scenario_id| build(&config_for(scenario_id)))
        .progress(simple_progress_reporter(1))
        .run(base.simulation_horizon);

    println!(
        "{:>5} {:>8} {:>8} {:>12} {:>12}",
        "pumps", "arrived", "served", "mean wait", "utilization"
    );
    for (scenario_id, result) in results.into_iter().enumerate() {
        let config = config_for(scenario_id);
        let pumps = config.server_capacity;
        let outcome = result.and_then(|stats| {
            RunOutcome::from_stats(config, stats).map_err(|e| e.to_string())
        });
        match outcome {
            Ok(outcome) => {
                let report = outcome.report();
                let mean_wait = report
                    .mean_wait_time
                    .map(|w| format!("{:.2}", w))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "{:>5} {:>8} {:>8} {:>12} {:>11.2}%",
                    pumps,
                    report.arrivals,
                    report.served_count,
                    mean_wait,
                    report.utilization_percentage
                );
            }
            Err(e) => println!("{:>5} failed: {}", pumps, e),
        }
    }
}
