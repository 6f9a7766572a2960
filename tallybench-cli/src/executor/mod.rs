//! Benchmark Executor
//!
//! Runs benchmarks and turns their measurements into reports.
//!
//! ## Pipeline Overview
//!
//! ```text
//! (name, Benchmarkable)   (selected by the planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Run benchmarks one at a time, collect runs
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Regression + bootstrap per benchmark (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Summary, CSV and JSON rendering
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential in-process execution with panic containment
//! - [`statistics`] - Parallel analysis
//! - [`report`] - Report building and machine-readable output
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;
mod report;
mod statistics;

// Re-export public API
pub use execution::{BenchExecutionResult, BenchmarkStatus, ExecutionConfig, Executor};
pub use formatting::{format_duration, format_human_output};
pub use report::{
    OutputFormat, Report, ReportSummary, build_report, generate_csv_report, generate_json_report,
};
pub use statistics::{BenchOutcome, compute_statistics};
