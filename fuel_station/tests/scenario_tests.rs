// Whole-run tests: determinism, invariants and reference scenarios
// Every run is seeded, so each assertion is about one fixed sample path

use des::parallel::run_parallel;
use fuel_station::{
    Dispatch, Event, RandomProcessSource, RunOutcome, StationConfig, StationError, Stream, build,
    run,
};

fn config(
    capacity: usize,
    interarrival: f64,
    service: f64,
    horizon: f64,
    seed: u64,
) -> StationConfig {
    StationConfig {
        mean_interarrival_time: interarrival,
        mean_service_time: service,
        simulation_horizon: horizon,
        server_capacity: capacity,
        random_seed: Some(seed),
        record_trace: true,
    }
}

fn low_load(seed: u64) -> StationConfig {
    config(1, 10.0, 2.0, 1000.0, seed)
}

fn saturated(seed: u64) -> StationConfig {
    config(1, 1.0, 5.0, 500.0, seed)
}

fn assorted_configs() -> Vec<StationConfig> {
    let mut configs = Vec::new();
    for seed in [1, 7, 42, 2024] {
        configs.push(low_load(seed));
        configs.push(saturated(seed));
        configs.push(config(2, 5.0, 7.0, 600.0, seed));
        configs.push(config(3, 1.0, 2.5, 300.0, seed));
    }
    configs
}

fn trace(outcome: &RunOutcome) -> &[Dispatch] {
    outcome.trace.as_deref().expect("trace was requested")
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn same_seed_gives_identical_runs() {
    let config = config(2, 5.0, 7.0, 600.0, 2024);

    let first = run(&config).unwrap();
    let second = run(&config).unwrap();

    assert!(!trace(&first).is_empty());
    assert_eq!(trace(&first), trace(&second));
    assert_eq!(first.statistics, second.statistics);
    assert_eq!(first, second);
}

#[test]
fn different_seeds_give_different_runs() {
    let a = run(&config(2, 5.0, 7.0, 600.0, 1)).unwrap();
    let b = run(&config(2, 5.0, 7.0, 600.0, 2)).unwrap();
    assert_ne!(a.statistics, b.statistics);
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let configs = assorted_configs();

    let results = run_parallel(configs.len(), |i| build(&configs[i]), 1000.0);

    for (config, result) in configs.iter().zip(results) {
        // the parallel loops ran to 1000, so rerun sequentially to the same point
        let sequential = run(&StationConfig {
            simulation_horizon: 1000.0,
            ..config.clone()
        })
        .unwrap();
        let parallel = RunOutcome::from_stats(sequential.config.clone(), result.unwrap()).unwrap();
        assert_eq!(parallel, sequential);
    }
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn pumps_in_use_stay_within_capacity() {
    for config in assorted_configs() {
        let outcome = run(&config).unwrap();
        assert!(outcome.peak_in_use <= config.server_capacity);

        // replay the trace: a pump is taken at acquisition, freed at completion
        let mut in_use: i64 = 0;
        for dispatch in trace(&outcome) {
            match dispatch.event {
                Event::ResourceAcquired { .. } => in_use += 1,
                Event::ServiceComplete { .. } => in_use -= 1,
                Event::Arrival { .. } => {}
            }
            assert!(in_use >= 0 && in_use <= config.server_capacity as i64);
        }
    }
}

#[test]
fn queued_vehicles_are_served_first_come_first_served() {
    for config in assorted_configs() {
        let outcome = run(&config).unwrap();
        let order = outcome.statistics.acquisition_order();
        assert!(
            order.windows(2).all(|w| w[0] < w[1]),
            "acquisitions out of arrival order for {:?}",
            config
        );
    }
}

#[test]
fn utilization_is_a_percentage() {
    for config in assorted_configs() {
        let utilization = run(&config).unwrap().utilization_percentage();
        assert!((0.0..=100.0).contains(&utilization), "{utilization} for {:?}", config);
    }
}

#[test]
fn waits_are_non_negative_and_services_positive() {
    for config in assorted_configs() {
        let outcome = run(&config).unwrap();
        assert!(outcome.statistics.wait_times().iter().all(|w| *w >= 0.0));
        assert!(outcome.statistics.service_durations().iter().all(|d| *d > 0.0));
    }
}

#[test]
fn every_arrival_is_accounted_for_at_the_horizon() {
    for config in assorted_configs() {
        let outcome = run(&config).unwrap();
        let stats = &outcome.statistics;

        // arrived = got a pump + still queued; got a pump = left + still filling up
        assert_eq!(outcome.arrivals, stats.acquired_count() + outcome.queued_at_horizon);
        assert_eq!(
            stats.acquired_count(),
            stats.served_count() + outcome.in_service_at_horizon
        );
        assert_eq!(stats.service_durations().len(), stats.acquired_count());
        assert!(trace(&outcome).iter().all(|d| d.time <= config.simulation_horizon));
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn single_pump_low_load() {
    let outcome = run(&low_load(42)).unwrap();

    // about horizon / mean interarrival = 100 vehicles
    let served = outcome.served_count();
    assert!((60..=140).contains(&served), "served {served}");
    // rho = 0.2, the expected wait in queue is 0.5
    let mean_wait = outcome.mean_wait_time().unwrap();
    assert!(mean_wait < 2.0, "mean wait {mean_wait}");
    assert!(!outcome.report().recommend_more_capacity);
}

#[test]
fn single_pump_saturation() {
    let outcome = run(&saturated(42)).unwrap();

    assert!(outcome.utilization_percentage() > 95.0);
    let mean_wait = outcome.mean_wait_time().unwrap();
    assert!(mean_wait > 50.0, "mean wait {mean_wait}");
    assert!(outcome.queued_at_horizon > 100);
    assert!(outcome.report().recommend_more_capacity);

    // the backlog keeps growing: late vehicles wait much longer than early ones
    let waits = outcome.statistics.wait_times();
    let quarter = waits.len() / 4;
    let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    assert!(mean(&waits[waits.len() - quarter..]) > 2.0 * mean(&waits[..quarter]));
}

#[test]
fn vehicle_still_at_the_pump_does_not_count_as_served() {
    // the horizon falls just after the first arrival, so vehicle 1 gets the
    // pump but cannot finish before the run stops
    let mut config = config(1, 10.0, 2.0, 1000.0, 5);
    let first_arrival = RandomProcessSource::for_stream(&config, Stream::Arrivals)
        .unwrap()
        .sample_interarrival();
    config.simulation_horizon = first_arrival + 1e-6;

    let outcome = run(&config).unwrap();

    assert_eq!(outcome.statistics.acquired_count(), 1);
    assert_eq!(outcome.in_service_at_horizon, 1);
    assert_eq!(outcome.served_count(), 0);
    assert!(matches!(outcome.mean_wait_time(), Err(StationError::EmptySample)));
    assert!(matches!(
        outcome.statistics.max_wait_time(),
        Err(StationError::EmptySample)
    ));
    assert_eq!(outcome.report().mean_wait_time, None);
}

#[test]
fn raw_utilization_counts_services_past_the_horizon() {
    let outcome = run(&saturated(42)).unwrap();
    assert!(outcome.raw_utilization_percentage() >= outcome.utilization_percentage());
}

#[test]
fn zero_pumps_is_rejected_before_the_run() {
    let config = StationConfig {
        server_capacity: 0,
        ..low_load(1)
    };
    assert!(matches!(run(&config), Err(StationError::InvalidParameter(_))));
    assert!(matches!(build(&config), Err(StationError::InvalidParameter(_))));
}

#[test]
fn horizon_before_first_arrival_serves_nobody() {
    let mut config = low_load(5);
    let first_arrival = RandomProcessSource::for_stream(&config, Stream::Arrivals)
        .unwrap()
        .sample_interarrival();
    config.simulation_horizon = first_arrival / 2.0;

    let outcome = run(&config).unwrap();

    assert_eq!(outcome.arrivals, 0);
    assert_eq!(outcome.served_count(), 0);
    assert!(trace(&outcome).is_empty());
    assert!(matches!(outcome.mean_wait_time(), Err(StationError::EmptySample)));
    assert_eq!(outcome.utilization_percentage(), 0.0);
    assert_eq!(outcome.report().mean_wait_time, None);
}

#[test]
fn unseeded_runs_still_respect_invariants() {
    let config = StationConfig {
        random_seed: None,
        ..config(2, 5.0, 7.0, 600.0, 0)
    };
    let outcome = run(&config).unwrap();
    assert!(outcome.peak_in_use <= 2);
    assert!((0.0..=100.0).contains(&outcome.utilization_percentage()));
}
