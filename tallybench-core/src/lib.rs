#![warn(missing_docs)]
//! TallyBench Core - Measurement Runtime
//!
//! This crate turns a unit of work into statistics:
//! - [`TimingContext`]: calibrated wall-clock, cycle and CPU-time measurement
//! - [`TrackingAllocator`]: optional allocation counting
//! - [`Benchmarkable`]: pure-function or side-effecting work with an explicit
//!   evaluation strategy
//! - [`Runner`]: warm-up and geometric-growth measurement state machine
//! - [`analyze`]: OLS regression and bootstrap intervals over the runs
//! - [`Benchmark`]: named tree of benchmarks flattened to qualified names

mod allocator;
mod analysis;
mod benchmarkable;
mod measure;
mod runner;
mod tree;

pub use allocator::{TrackingAllocator, current_allocation, reset_allocation_counter};
pub use analysis::{Analysis, AnalysisError, ReportRow, analyze};
pub use benchmarkable::{BATCH_SIZE, Benchmarkable, BenchmarkableKind, Evaluation};
/// Whether this platform provides hardware cycle counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, cycle counts are reported as 0 and only wall-clock nanoseconds are available.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{Measured, Timer, TimingContext, cpu_time_ns, pin_to_cpu};
pub use runner::{
    DEFAULT_GROWTH_FACTOR, DEFAULT_MAX_SAMPLES, DEFAULT_MEASUREMENT_TIME_NS, DEFAULT_MIN_SAMPLES,
    DEFAULT_WARMUP_TIME_NS, MeasurementSet, Phase, RunConfig, Runner,
};
pub use tree::{Benchmark, bench, flatten_all, group};
