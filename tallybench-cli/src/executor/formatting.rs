//! Output Formatting
//!
//! Human-readable output formatting for benchmark reports.
//!
//! Generates terminal-friendly output with:
//! - Per-benchmark status icons (✓/✗/💥)
//! - Regression slope and R² with confidence bounds
//! - Mean and standard deviation with confidence bounds
//! - Outlier counts and how much they inflate the variance

use super::execution::BenchmarkStatus;
use super::report::Report;
use tallybench_core::Analysis;
use tallybench_stats::{BootstrapResult, OutlierEffect};

/// Format nanoseconds with an adaptive unit (ns, µs, ms, s)
pub fn format_duration(ns: f64) -> String {
    if !ns.is_finite() {
        return format!("{ns}");
    }
    let abs = ns.abs();
    if abs < 1_000.0 {
        format!("{:.2} ns", ns)
    } else if abs < 1_000_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else if abs < 1_000_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else {
        format!("{:.2} s", ns / 1_000_000_000.0)
    }
}

fn format_estimate(label: &str, estimate: &BootstrapResult) -> String {
    let ci = &estimate.confidence_interval;
    format!(
        "      {:<10} {}  ({} .. {})\n",
        label,
        format_duration(estimate.point_estimate),
        format_duration(ci.lower),
        format_duration(ci.upper)
    )
}

fn format_analysis(output: &mut String, analysis: &Analysis) {
    output.push_str(&format_estimate("time", &analysis.slope));

    let r2 = &analysis.r_squared;
    output.push_str(&format!(
        "      {:<10} {:.4}  ({:.4} .. {:.4})\n",
        "R²", r2.point_estimate, r2.confidence_interval.lower, r2.confidence_interval.upper
    ));
    output.push_str(&format_estimate("mean", &analysis.mean));
    output.push_str(&format_estimate("std dev", &analysis.std_dev));

    let outliers = &analysis.outliers;
    if outliers.total() > 0 {
        output.push_str(&format!(
            "      found {} outliers among {} runs ({:.1}%): {} low severe, {} low mild, {} high mild, {} high severe\n",
            outliers.total(),
            outliers.samples_seen,
            outliers.outlier_percentage(),
            outliers.low_severe,
            outliers.low_mild,
            outliers.high_mild,
            outliers.high_severe
        ));
    }

    let effect = match analysis.outlier_variance.effect {
        OutlierEffect::Unaffected => None,
        OutlierEffect::Slight => Some("slightly"),
        OutlierEffect::Moderate => Some("moderately"),
        OutlierEffect::Severe => Some("severely"),
    };
    if let Some(effect) = effect {
        output.push_str(&format!(
            "      variance introduced by outliers: {:.0}% ({} inflated)\n",
            analysis.outlier_variance.fraction * 100.0,
            effect
        ));
    }
}

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("TallyBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for result in &report.results {
        let status_icon = match result.status {
            BenchmarkStatus::Passed => "✓",
            BenchmarkStatus::Failed => "✗",
            BenchmarkStatus::Crashed => "💥",
        };

        output.push_str(&format!("  {} {}\n", status_icon, result.name));

        if let Some(analysis) = &result.analysis {
            format_analysis(&mut output, analysis);
            output.push_str(&format!(
                "      runs: {}  iterations: {}\n",
                result.runs, result.iterations
            ));
        }

        if result.alloc_count > 0 && result.iterations > 0 {
            output.push_str(&format!(
                "      allocations: {:.1} bytes ({:.2} allocs) per iteration\n",
                result.alloc_bytes as f64 / result.iterations as f64,
                result.alloc_count as f64 / result.iterations as f64
            ));
        }

        if let Some(error) = &result.error {
            output.push_str(&format!("      error: {}\n", error));
        }

        output.push('\n');
    }

    // Summary
    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Crashed: {}\n",
        report.summary.total_benchmarks,
        report.summary.passed,
        report.summary.failed,
        report.summary.crashed
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}
