use std::env;

use fuel_station::{StationConfig, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("DES: Fuel Station");
    println!("=================\n");

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => StationConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config {}: {}", path, e);
            std::process::exit(1);
        }),
        None => StationConfig::default(),
    };

    println!("Configuration:");
    println!("  - Pumps: {}", config.server_capacity);
    println!("  - Mean interarrival time: {}", config.mean_interarrival_time);
    println!("  - Mean service time: {}", config.mean_service_time);
    println!("  - Horizon: {}", config.simulation_horizon);
    println!("  - Offered load per pump: {:.2}", config.offered_load());
    match config.random_seed {
        Some(seed) => println!("  - Seed: {}\n", seed),
        None => println!("  - Seed: none (not reproducible)\n"),
    }

    match run(&config) {
        Ok(outcome) => {
            println!("{}", outcome.report());
            println!(
                "(utilization counting services past the horizon in full: {:.2}%)",
                outcome.raw_utilization_percentage()
            );
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
