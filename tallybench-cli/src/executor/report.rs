//! Report Building
//!
//! Collects analyzed outcomes into a [`Report`] and renders the
//! machine-readable formats.
//!
//! ## Pipeline
//!
//! ```text
//!   BenchOutcome (per benchmark)
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │       Report        │  outcomes + pass/fail/crash summary
//!   └──────────┬──────────┘
//!              │
//!     ┌────────┼─────────┐
//!     ▼        ▼         ▼
//!    CSV      JSON     human
//! ```
//!
//! CSV is one [`ReportRow`] per analyzed benchmark with a fixed column order:
//! `Name, Mean, MeanLB, MeanUB, Stddev, StddevLB, StddevUB` (seconds).

use super::execution::BenchmarkStatus;
use super::statistics::BenchOutcome;
use serde::{Deserialize, Serialize};
use tallybench_core::ReportRow;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full analyses
    Json,
    /// CSV rows for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Counts over a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Benchmarks selected
    pub total_benchmarks: usize,
    /// Measured and analyzed
    pub passed: usize,
    /// Measured but not analyzable
    pub failed: usize,
    /// Panicked
    pub crashed: usize,
    /// Wall time of the whole run
    pub total_duration_ms: f64,
}

/// Everything produced by one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Per-benchmark outcomes in run order
    pub results: Vec<BenchOutcome>,
    /// Totals
    pub summary: ReportSummary,
}

impl Report {
    /// Fixed-column rows for every analyzed benchmark
    pub fn rows(&self) -> Vec<ReportRow> {
        self.results
            .iter()
            .filter_map(|r| r.analysis.as_ref().map(|a| ReportRow::new(&r.name, a)))
            .collect()
    }

    /// Whether any benchmark panicked
    pub fn has_crashes(&self) -> bool {
        self.summary.crashed > 0
    }
}

/// Build a complete Report from analyzed outcomes
pub fn build_report(results: Vec<BenchOutcome>, total_duration_ms: f64) -> Report {
    let mut summary = ReportSummary {
        total_benchmarks: results.len(),
        total_duration_ms,
        ..Default::default()
    };

    for result in &results {
        match result.status {
            BenchmarkStatus::Passed => summary.passed += 1,
            BenchmarkStatus::Failed => summary.failed += 1,
            BenchmarkStatus::Crashed => summary.crashed += 1,
        }
    }

    Report { results, summary }
}

/// Render the report as CSV, header row first
pub fn generate_csv_report(report: &Report) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let rows = report.rows();
    if rows.is_empty() {
        wtr.write_record(ReportRow::HEADERS)?;
    }
    for row in &rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render the report as pretty-printed JSON
pub fn generate_json_report(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: BenchmarkStatus) -> BenchOutcome {
        BenchOutcome {
            name: name.to_string(),
            status,
            runs: 0,
            iterations: 0,
            alloc_bytes: 0,
            alloc_count: 0,
            analysis: None,
            error: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let report = build_report(
            vec![
                outcome("a", BenchmarkStatus::Passed),
                outcome("b", BenchmarkStatus::Crashed),
                outcome("c", BenchmarkStatus::Failed),
                outcome("d", BenchmarkStatus::Passed),
            ],
            12.5,
        );

        assert_eq!(report.summary.total_benchmarks, 4);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.crashed, 1);
        assert!(report.has_crashes());
    }

    #[test]
    fn test_csv_header_without_rows() {
        let report = build_report(vec![outcome("x", BenchmarkStatus::Crashed)], 0.0);
        let csv = generate_csv_report(&report).unwrap();
        assert_eq!(csv, "Name,Mean,MeanLB,MeanUB,Stddev,StddevLB,StddevUB\n");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
