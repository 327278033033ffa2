//! Parallel execution of independent EventLoop scenarios
//!
//! Each scenario is built, run and reduced to its agents' stats on a `rayon`
//! worker. Scenarios share nothing, so a parameter sweep gives the same
//! results whatever the thread count or completion order, as long as every
//! builder seeds its own RNGs from the scenario id.
//!
//! A scenario that fails to build, returns an engine error or panics becomes
//! an `Err(String)` in its slot; the other scenarios carry on.

use crate::EventLoop;
use log::{info, warn};
use rayon::prelude::*;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type ScenarioResult<S> = Result<Vec<S>, String>;

/// Runs `num_scenarios` independent event loops in parallel.
///
/// The builder receives the scenario id and returns a fresh, fully seeded
/// `EventLoop`.
///
/// ```rust
/// use des::parallel::ParallelRunner;
/// # use des::{Agent, EventLoop};
/// # struct TestAgent;
/// # impl Agent<u8, usize> for TestAgent {
/// #     fn stats(&self) -> usize { 1 }
/// # }
///
/// let results = ParallelRunner::new(50, |_scenario_id| {
///     let agents: Vec<Box<dyn Agent<u8, usize>>> = vec![Box::new(TestAgent)];
///     EventLoop::new(vec![(0.0, 1)], agents)
/// })
/// .num_threads(4)
/// .run(1000.0);
///
/// assert_eq!(results.len(), 50);
/// ```
pub struct ParallelRunner<T, S, E, F>
where
    F: Fn(usize) -> Result<EventLoop<T, S>, E> + Send + Sync,
    S: Send,
    E: Display,
{
    num_scenarios: usize,
    builder: F,
    num_threads: Option<usize>,
    progress_callback: Option<Arc<dyn Fn(usize, usize) + Send + Sync>>,
    _marker: PhantomData<fn() -> (T, S, E)>,
}

impl<T, S, E, F> ParallelRunner<T, S, E, F>
where
    F: Fn(usize) -> Result<EventLoop<T, S>, E> + Send + Sync,
    S: Send,
    E: Display,
{
    pub fn new(num_scenarios: usize, builder: F) -> Self {
        ParallelRunner {
            num_scenarios,
            builder,
            num_threads: None,
            progress_callback: None,
            _marker: PhantomData,
        }
    }

    /// Set number of threads (defaults to rayon's global pool)
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Called with `(completed, total)` after each scenario finishes.
    pub fn progress<P>(mut self, callback: P) -> Self
    where
        P: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    fn run_one(&self, scenario_id: usize, until: f64) -> ScenarioResult<S> {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> ScenarioResult<S> {
            let mut event_loop = (self.builder)(scenario_id).map_err(|e| e.to_string())?;
            event_loop.run_until(until).map_err(|e| e.to_string())?;
            Ok(event_loop.stats())
        }));

        result.unwrap_or_else(|panic| {
            if let Some(s) = panic.downcast_ref::<&str>() {
                Err(s.to_string())
            } else if let Some(s) = panic.downcast_ref::<String>() {
                Err(s.clone())
            } else {
                Err("Unknown panic".to_string())
            }
        })
    }

    /// Executes all scenarios up to simulated time `until` and returns their
    /// results in scenario id order.
    pub fn run(self, until: f64) -> Vec<ScenarioResult<S>> {
        let progress_counter = AtomicUsize::new(0);

        let pool = self.num_threads.and_then(|n| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| warn!("falling back to the global rayon pool: {e}"))
                .ok()
        });

        let execute = || {
            (0..self.num_scenarios)
                .into_par_iter()
                .map(|scenario_id| {
                    let result = self.run_one(scenario_id, until);
                    let completed = progress_counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(completed, self.num_scenarios);
                    }
                    result
                })
                .collect()
        };

        match pool {
            Some(pool) => pool.install(execute),
            None => execute(),
        }
    }
}

/// Convenience wrapper around [`ParallelRunner`] with default settings.
pub fn run_parallel<T, S, E, F>(
    num_scenarios: usize,
    builder: F,
    until: f64,
) -> Vec<ScenarioResult<S>>
where
    F: Fn(usize) -> Result<EventLoop<T, S>, E> + Send + Sync,
    S: Send,
    E: Display,
{
    ParallelRunner::new(num_scenarios, builder).run(until)
}

/// Progress callback that logs every `interval` completed scenarios.
pub fn simple_progress_reporter(interval: usize) -> impl Fn(usize, usize) + Send + Sync {
    let interval = interval.max(1);
    move |completed, total| {
        if completed % interval == 0 || completed == total {
            info!("completed {}/{} scenarios", completed, total);
        }
    }
}
