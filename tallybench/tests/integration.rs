//! Integration tests for TallyBench
//!
//! These tests verify the end-to-end behavior of the benchmarking system.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tallybench::prelude::*;
use tallybench::{
    BootstrapConfig, ContinuousDistribution, MatchMode, MeasurementSet, Measured,
    NormalDistribution, ReportRow, RunConfig, Runner, SelectionError, TimingContext, analyze,
    build_matcher, flatten_all, powers,
};
use tallybench_cli::{
    ExecutionConfig, Executor, build_report, compute_statistics, generate_csv_report, select,
};

fn quick_run() -> RunConfig {
    RunConfig {
        warmup_time_ns: 2_000_000,
        measurement_time_ns: 20_000_000,
        max_samples: 40,
        min_samples: 10,
        ..RunConfig::default()
    }
}

fn quick_bootstrap() -> BootstrapConfig {
    BootstrapConfig {
        iterations: 500,
        ..BootstrapConfig::default()
    }
}

fn suite() -> Vec<Benchmark> {
    vec![
        group(
            "sum",
            vec![
                bench(
                    "range",
                    Benchmarkable::pure(|n: &u64| (0..*n).sum::<u64>(), 1_000, Evaluation::Deep),
                ),
                bench(
                    "vec",
                    Benchmarkable::action_with_setup(
                        || vec![1u64; 16],
                        |v: Vec<u64>| v.iter().sum::<u64>(),
                    ),
                ),
            ],
        ),
        group(
            "sort",
            vec![bench(
                "reversed",
                Benchmarkable::action(|| {
                    let mut v: Vec<u32> = (0..128).rev().collect();
                    v.sort_unstable();
                    v
                }),
            )],
        ),
    ]
}

/// The whole pipeline: tree, selection, measurement, analysis, CSV
#[test]
fn test_end_to_end_csv() {
    let matcher = build_matcher(MatchMode::Glob, &["sum/*".to_string()]).unwrap();
    let plan = select(flatten_all(suite()), &matcher).unwrap();
    assert_eq!(plan.names(), ["sum/range", "sum/vec"]);

    let mut executor = Executor::new(ExecutionConfig {
        run: quick_run(),
        ..ExecutionConfig::default()
    });
    let results = executor.execute(plan.benchmarks);
    let outcomes = compute_statistics(&results, &quick_bootstrap());
    let report = build_report(outcomes, 0.0);

    assert_eq!(report.summary.total_benchmarks, 2);
    assert_eq!(report.summary.passed, 2);

    let csv = generate_csv_report(&report).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Name,Mean,MeanLB,MeanUB,Stddev,StddevLB,StddevUB")
    );

    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("sum/range,"));
    assert!(rows[1].starts_with("sum/vec,"));

    for row in report.rows() {
        assert!(row.mean > 0.0);
        assert!(row.mean_lower <= row.mean && row.mean <= row.mean_upper);
        assert!(row.std_dev_lower <= row.std_dev_upper);
    }
}

/// Prefix selection is by leading characters of the qualified name
#[test]
fn test_prefix_selection() {
    let matcher = build_matcher(MatchMode::Prefix, &["so".to_string()]).unwrap();
    let plan = select(flatten_all(suite()), &matcher).unwrap();
    assert_eq!(plan.names(), ["sort/reversed"]);

    let matcher = build_matcher(MatchMode::Prefix, &[]).unwrap();
    let plan = select(flatten_all(suite()), &matcher).unwrap();
    assert_eq!(plan.names(), ["sum/range", "sum/vec", "sort/reversed"]);
}

#[test]
fn test_bad_glob_is_usage_error() {
    let err = build_matcher(MatchMode::Glob, &["sum/[".to_string()]).unwrap_err();
    assert!(matches!(err, SelectionError::BadPattern(_)));

    let diagnostic = tallybench_cli::usage_diagnostic(&err);
    assert!(diagnostic.starts_with("error: "));
    assert!(diagnostic.ends_with("run with --help for usage information"));
}

/// Runner output feeds straight into analysis
#[test]
fn test_runner_measurements_are_analyzable() {
    let ctx = TimingContext::initialize();
    let mut runner = Runner::new(&ctx, quick_run());
    let mut work = Benchmarkable::pure(
        |n: &u64| (1..=*n).fold(0u64, |a, x| a.wrapping_mul(31).wrapping_add(x)),
        500,
        Evaluation::Deep,
    );

    let set = runner.run(&mut work);
    assert!(set.len() >= 10);
    assert!(set.distinct_iterations() >= 2);

    let iterations: Vec<u64> = set.samples().iter().map(|m| m.iterations).collect();
    assert!(iterations.windows(2).all(|w| w[1] > w[0]));

    let analysis = runner.analyze(&set, &quick_bootstrap()).unwrap();
    assert!(analysis.slope.point_estimate > 0.0);
    assert_eq!(analysis.samples, set.len());
}

/// A synthetic linear workload: the slope recovers the per-iteration cost
#[test]
fn test_analysis_recovers_synthetic_cost() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut iterations = 1u64;
    let mut samples = Vec::new();
    for _ in 0..60 {
        let noise: f64 = rng.gen_range(-0.02..0.02);
        let time_ns = (iterations as f64 * 250.0 * (1.0 + noise)) as u64;
        samples.push(Measured {
            iterations,
            time_ns,
            ..Measured::default()
        });
        iterations = ((iterations as f64 * 1.05) as u64).max(iterations + 1);
    }

    let analysis = analyze(&MeasurementSet::new(samples), &quick_bootstrap()).unwrap();
    assert!((analysis.slope.point_estimate - 250.0).abs() < 10.0);
    assert!(analysis.r_squared.point_estimate > 0.99);

    let row = ReportRow::new("synthetic", &analysis);
    assert!((row.mean - 250e-9).abs() < 10e-9);
}

#[test]
fn test_powers_agree_with_normal_fit() {
    let mut rng = StdRng::seed_from_u64(3);
    let sample: Vec<f64> = (0..1_000).map(|_| rng.gen_range(0.0..10.0)).collect();

    let p = powers(4, &sample);
    let normal = NormalDistribution::from_sample(&sample);
    assert!((p.mean() - normal.mean()).abs() < 1e-9);
    assert!((p.variance() - normal.variance()).abs() < 1e-6);

    // Uniform(0, 10): skewness near 0, excess kurtosis near -1.2
    assert!(p.skewness().abs() < 0.2);
    assert!((p.kurtosis() + 1.2).abs() < 0.2);
}

#[test]
fn test_normal_quantile_round_trip() {
    let normal = NormalDistribution::new(3.0, 4.0);
    for &p in &[0.001, 0.025, 0.5, 0.975, 0.999] {
        let x = normal.quantile(p);
        assert!((normal.cumulative(x) - p).abs() < 1e-9, "p = {p}");
    }
    assert!((normal.quantile(0.975) - (3.0 + 2.0 * 1.959_963_984_540_054)).abs() < 1e-6);
    assert!(normal.quantile(1.5).is_nan());
}
