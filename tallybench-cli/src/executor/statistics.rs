//! Statistics Computation
//!
//! Parallel analysis of benchmark results.
//!
//! Measurement is over by the time this runs, so Rayon is free to use every
//! core: each benchmark's measurement set is analyzed independently (OLS fit,
//! bootstrap intervals, outlier classification, summary).

use super::execution::{BenchExecutionResult, BenchmarkStatus};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tallybench_core::{Analysis, analyze};
use tallybench_stats::BootstrapConfig;
use tracing::warn;

/// A benchmark after analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchOutcome {
    /// Qualified benchmark name
    pub name: String,
    /// Final status
    pub status: BenchmarkStatus,
    /// Measured runs
    pub runs: usize,
    /// Total iterations over all runs
    pub iterations: u64,
    /// Bytes allocated over all runs (0 unless tracking)
    pub alloc_bytes: u64,
    /// Allocations over all runs (0 unless tracking)
    pub alloc_count: u64,
    /// Estimates; `None` for crashed or unanalyzable benchmarks
    pub analysis: Option<Analysis>,
    /// Why there is no analysis
    pub error: Option<String>,
}

/// Analyze benchmark results (parallelized with Rayon)
///
/// Output order matches `results`.
pub fn compute_statistics(
    results: &[BenchExecutionResult],
    config: &BootstrapConfig,
) -> Vec<BenchOutcome> {
    results
        .par_iter()
        .map(|r| {
            let Some(set) = r.measurements.as_ref() else {
                return BenchOutcome {
                    name: r.name.clone(),
                    status: r.status,
                    runs: 0,
                    iterations: 0,
                    alloc_bytes: 0,
                    alloc_count: 0,
                    analysis: None,
                    error: r.error_message.clone(),
                };
            };

            let (status, analysis, error) = match analyze(set, config) {
                Ok(analysis) => (r.status, Some(analysis), None),
                Err(e) => {
                    warn!(benchmark = %r.name, error = %e, "analysis failed");
                    (BenchmarkStatus::Failed, None, Some(e.to_string()))
                }
            };

            BenchOutcome {
                name: r.name.clone(),
                status,
                runs: set.len(),
                iterations: set.total_iterations(),
                alloc_bytes: set.samples().iter().map(|m| m.alloc_bytes).sum(),
                alloc_count: set.samples().iter().map(|m| m.alloc_count).sum(),
                analysis,
                error,
            }
        })
        .collect()
}
