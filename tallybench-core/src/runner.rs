//! Runner - The Measurement State Machine
//!
//! `Idle → WarmingUp → Measuring(n) → {Measuring(next(n)) | Done} → Analyzed`
//!
//! Warm-up doubles the iteration count until its time budget is spent,
//! which both stabilizes caches and yields a per-iteration estimate. The
//! measurement phase then starts at the smallest iteration count the clock
//! can time accurately and grows it geometrically, recording one
//! [`Measured`] per run, until the sample cap is reached or the time budget
//! is spent with enough samples collected.
//!
//! Runs are strictly sequential and block the calling thread.

use crate::analysis::{Analysis, AnalysisError, analyze};
use crate::benchmarkable::Benchmarkable;
use crate::measure::{Measured, TimingContext, pin_to_cpu};
use serde::{Deserialize, Serialize};
use tallybench_stats::BootstrapConfig;
use tracing::{debug, warn};

/// Default warm-up budget (3 seconds)
pub const DEFAULT_WARMUP_TIME_NS: u64 = 3_000_000_000;

/// Default measurement budget (5 seconds)
pub const DEFAULT_MEASUREMENT_TIME_NS: u64 = 5_000_000_000;

/// Default cap on measured runs
pub const DEFAULT_MAX_SAMPLES: usize = 300;

/// Runs collected before the time budget may end measurement
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Default geometric growth of the iteration count between runs
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.05;

/// Measurement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Warm-up budget in nanoseconds
    pub warmup_time_ns: u64,
    /// Measurement budget in nanoseconds
    pub measurement_time_ns: u64,
    /// Maximum number of measured runs
    pub max_samples: usize,
    /// Minimum number of measured runs
    pub min_samples: usize,
    /// Iteration count multiplier between runs (must exceed 1)
    pub growth_factor: f64,
    /// Pin the measuring thread to this CPU
    pub pin_cpu: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup_time_ns: DEFAULT_WARMUP_TIME_NS,
            measurement_time_ns: DEFAULT_MEASUREMENT_TIME_NS,
            max_samples: DEFAULT_MAX_SAMPLES,
            min_samples: DEFAULT_MIN_SAMPLES,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            pin_cpu: None,
        }
    }
}

/// Where a [`Runner`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing measured yet
    Idle,
    /// Running the warm-up budget
    WarmingUp,
    /// Timing a run of `iterations` iterations
    Measuring {
        /// Iterations in the current run
        iterations: u64,
    },
    /// All runs recorded
    Done,
    /// Statistics computed from the recorded runs
    Analyzed,
}

/// Every run recorded for one benchmark, in execution order
///
/// Immutable once collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    samples: Box<[Measured]>,
}

impl MeasurementSet {
    /// Wrap already-collected runs
    pub fn new(samples: Vec<Measured>) -> Self {
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    /// Recorded runs
    pub fn samples(&self) -> &[Measured] {
        &self.samples
    }

    /// Number of recorded runs
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(iterations, wall-clock nanoseconds)` per run
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|m| (m.iterations as f64, m.time_ns as f64))
            .collect()
    }

    /// Wall-clock nanoseconds per iteration, per run
    pub fn per_iteration_times(&self) -> Vec<f64> {
        self.samples.iter().map(Measured::time_per_iteration).collect()
    }

    /// Number of different iteration counts among the runs
    pub fn distinct_iterations(&self) -> usize {
        let mut counts: Vec<u64> = self.samples.iter().map(|m| m.iterations).collect();
        counts.sort_unstable();
        counts.dedup();
        counts.len()
    }

    /// Wall-clock nanoseconds over all runs
    pub fn total_time_ns(&self) -> u64 {
        self.samples.iter().map(|m| m.time_ns).sum()
    }

    /// Iterations over all runs
    pub fn total_iterations(&self) -> u64 {
        self.samples.iter().map(|m| m.iterations).sum()
    }
}

/// Drives one benchmark at a time through warm-up, measurement and analysis
pub struct Runner<'a> {
    ctx: &'a TimingContext,
    config: RunConfig,
    phase: Phase,
    between_runs: Option<Box<dyn FnMut() + 'a>>,
}

impl<'a> Runner<'a> {
    /// Create a runner measuring with `ctx`
    pub fn new(ctx: &'a TimingContext, config: RunConfig) -> Self {
        assert!(
            config.growth_factor > 1.0,
            "growth factor must exceed 1, got {}",
            config.growth_factor
        );
        Self {
            ctx,
            config,
            phase: Phase::Idle,
            between_runs: None,
        }
    }

    /// Call `hook` before every measured run (outside the timed region),
    /// e.g. to flush caches.
    pub fn with_between_runs<F: FnMut() + 'a>(mut self, hook: F) -> Self {
        self.between_runs = Some(Box::new(hook));
        self
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Settings in use
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }

    /// Warm up and measure `bench`, returning every measured run.
    pub fn run(&mut self, bench: &mut Benchmarkable) -> MeasurementSet {
        self.transition(Phase::Idle);

        if let Some(cpu) = self.config.pin_cpu {
            if let Err(e) = pin_to_cpu(cpu) {
                warn!(cpu, error = %e, "failed to pin measuring thread");
            }
        }

        self.transition(Phase::WarmingUp);
        let per_iteration_ns = self.warm_up(bench);

        let min_run_ns = self.ctx.min_run_time().as_nanos() as f64;
        let mut iterations = (min_run_ns / per_iteration_ns.max(1.0)).ceil().max(1.0) as u64;

        let max_samples = self.config.max_samples.max(1);
        let min_samples = self.config.min_samples.min(max_samples);
        let mut samples = Vec::with_capacity(max_samples);
        let mut spent_ns: u64 = 0;

        loop {
            self.transition(Phase::Measuring { iterations });
            if let Some(hook) = self.between_runs.as_mut() {
                hook();
            }

            let measured = bench.run(iterations, self.ctx);
            spent_ns = spent_ns.saturating_add(measured.time_ns);
            samples.push(measured);

            let budget_spent = spent_ns >= self.config.measurement_time_ns;
            if samples.len() >= max_samples || (budget_spent && samples.len() >= min_samples) {
                break;
            }

            iterations = next_iteration_count(iterations, self.config.growth_factor);
        }

        self.transition(Phase::Done);
        debug!(
            runs = samples.len(),
            total_ns = spent_ns,
            "measurement finished"
        );
        MeasurementSet::new(samples)
    }

    /// Doubling warm-up; returns the estimated nanoseconds per iteration.
    fn warm_up(&mut self, bench: &mut Benchmarkable) -> f64 {
        let mut iterations: u64 = 1;
        let mut total_iterations: u64 = 0;
        let mut elapsed_ns: u64 = 0;

        loop {
            let measured = bench.run(iterations, self.ctx);
            total_iterations = total_iterations.saturating_add(iterations);
            elapsed_ns = elapsed_ns.saturating_add(measured.time_ns);

            if elapsed_ns >= self.config.warmup_time_ns {
                break;
            }
            iterations = iterations.saturating_mul(2);
        }

        let estimate = elapsed_ns as f64 / total_iterations as f64;
        debug!(
            iterations = total_iterations,
            per_iteration_ns = estimate,
            "warm-up finished"
        );
        estimate
    }

    /// Compute statistics for a set produced by [`Runner::run`].
    pub fn analyze(
        &mut self,
        set: &MeasurementSet,
        bootstrap: &BootstrapConfig,
    ) -> Result<Analysis, AnalysisError> {
        let analysis = analyze(set, bootstrap)?;
        self.transition(Phase::Analyzed);
        Ok(analysis)
    }
}

/// Geometric growth that always advances by at least one iteration
fn next_iteration_count(current: u64, growth: f64) -> u64 {
    let grown = (current as f64 * growth).floor() as u64;
    grown.max(current.saturating_add(1))
}
