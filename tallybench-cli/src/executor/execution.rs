//! Benchmark Execution
//!
//! Runs the selected benchmarks one after another in this process. Only one
//! benchmark is ever timed at a time: concurrent work would contend for the
//! same cores and caches.
//!
//! ## Data Flow
//!
//! ```text
//! (qualified name, Benchmarkable)   (from the selected plan)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │     Executor     │  Warmup → Measurement (Runner), panics caught
//! └────────┬─────────┘
//!          │
//!          ▼
//!  BenchExecutionResult (status, measurement set, wall time)
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tallybench_core::{Benchmarkable, MeasurementSet, RunConfig, Runner, TimingContext};
use tracing::{info, warn};

/// Configuration for benchmark execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Measurement settings shared by every benchmark
    pub run: RunConfig,
    /// Track allocations
    pub track_allocations: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

/// Outcome of one benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkStatus {
    /// Measured and analyzed
    Passed,
    /// Measured, but the runs could not be analyzed
    Failed,
    /// Panicked while running
    Crashed,
}

/// Result from executing a single benchmark
#[derive(Debug)]
pub struct BenchExecutionResult {
    /// Qualified benchmark name
    pub name: String,
    /// Passed (measured) or crashed
    pub status: BenchmarkStatus,
    /// Every measured run; `None` if the benchmark crashed
    pub measurements: Option<MeasurementSet>,
    /// Wall time spent on this benchmark, warm-up included
    pub duration_ns: u64,
    /// Panic message for crashed benchmarks
    pub error_message: Option<String>,
}

/// Execute benchmarks and produce results (in-process, sequential)
pub struct Executor {
    config: ExecutionConfig,
    ctx: TimingContext,
    results: Vec<BenchExecutionResult>,
}

impl Executor {
    /// Create an executor, calibrating the clock once
    pub fn new(config: ExecutionConfig) -> Self {
        let ctx = TimingContext::initialize().with_allocation_tracking(config.track_allocations);
        Self {
            config,
            ctx,
            results: Vec::new(),
        }
    }

    /// Timing state used for every benchmark
    pub fn timing_context(&self) -> &TimingContext {
        &self.ctx
    }

    /// Execute all provided benchmarks in order
    pub fn execute(
        &mut self,
        benchmarks: Vec<(String, Benchmarkable)>,
    ) -> Vec<BenchExecutionResult> {
        let pb = if self.config.show_progress {
            ProgressBar::new(benchmarks.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for (name, benchmarkable) in benchmarks {
            pb.set_message(name.clone());
            let result = self.execute_single(name, benchmarkable);
            self.results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        std::mem::take(&mut self.results)
    }

    /// Execute a single benchmark
    fn execute_single(&self, name: String, mut benchmarkable: Benchmarkable) -> BenchExecutionResult {
        let start = Instant::now();

        // Run with panic catching
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut runner = Runner::new(&self.ctx, self.config.run.clone());
            runner.run(&mut benchmarkable)
        }));

        let duration_ns = start.elapsed().as_nanos() as u64;

        match result {
            Ok(measurements) => {
                info!(
                    benchmark = %name,
                    runs = measurements.len(),
                    duration_ms = duration_ns / 1_000_000,
                    "benchmark measured"
                );
                BenchExecutionResult {
                    name,
                    status: BenchmarkStatus::Passed,
                    measurements: Some(measurements),
                    duration_ns,
                    error_message: None,
                }
            }
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                warn!(benchmark = %name, %message, "benchmark crashed");

                BenchExecutionResult {
                    name,
                    status: BenchmarkStatus::Crashed,
                    measurements: None,
                    duration_ns,
                    error_message: Some(message),
                }
            }
        }
    }
}
