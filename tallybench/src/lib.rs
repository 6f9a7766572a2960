#![warn(missing_docs)]
//! # TallyBench
//!
//! Descriptive statistics and a statistically rigorous microbenchmark harness.
//!
//! - **Statistics**: power-sum moments, percentiles, normal distribution with
//!   quantile inversion, OLS regression, bootstrap confidence intervals
//! - **Measurement**: warm-up, geometrically growing iteration counts, cycle
//!   and CPU time counters, optional allocation tracking
//! - **Analysis**: per-iteration slope and R² by regression, bootstrapped mean
//!   and standard deviation, outlier classification
//! - **CLI**: prefix or glob selection over a benchmark tree, human/CSV/JSON
//!   reports, `tally.toml` configuration
//!
//! ## Quick Start
//!
//! ```ignore
//! use tallybench::prelude::*;
//!
//! fn fib(n: u64) -> u64 {
//!     if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     tallybench::run(vec![group(
//!         "fib",
//!         vec![
//!             bench("10", Benchmarkable::pure(|n: &u64| fib(*n), 10, Evaluation::Deep)),
//!             bench("20", Benchmarkable::pure(|n: &u64| fib(*n), 20, Evaluation::Deep)),
//!         ],
//!     )])
//! }
//! ```
//!
//! ## Statistics Only
//!
//! ```
//! let p = tallybench::powers(2, &[1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(p.mean(), 2.5);
//! ```

// Re-export core types
pub use tallybench_core::{
    Analysis, AnalysisError, Benchmark, Benchmarkable, BenchmarkableKind, Evaluation,
    MeasurementSet, Measured, Phase, ReportRow, RunConfig, Runner, TimingContext,
    TrackingAllocator, analyze, bench, current_allocation, flatten_all, group,
    reset_allocation_counter,
};

// Re-export stats
pub use tallybench_stats::{
    BootstrapConfig, BootstrapResult, ContinuousDistribution, NormalDistribution, PowerSums,
    Regression, SampleSummary, array, compute_bootstrap, compute_summary, find_root, ols, powers,
};

// Re-export CLI types
pub use tallybench_cli::{
    Cli, EXIT_USAGE, Glob, MatchMode, Matcher, SelectionError, TallyConfig, build_matcher,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Benchmark, Benchmarkable, Evaluation, bench, group};
}

/// Run the TallyBench CLI harness over a benchmark tree.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     tallybench::run(benchmarks())
/// }
/// ```
pub use tallybench_cli::run;
