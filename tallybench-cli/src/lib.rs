#![warn(missing_docs)]
//! TallyBench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Build a tree of benchmarks and hand it to `tallybench::run()` (or
//! `tallybench_cli::run()`) in your main function to get the full tallybench
//! CLI experience.
//!
//! # Example
//!
//! ```ignore
//! use tallybench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     tallybench::run(vec![group(
//!         "fib",
//!         vec![bench("20", Benchmarkable::pure(|n: &u64| fib(*n), 20, Evaluation::Deep))],
//!     )])
//! }
//! ```

mod config;
mod executor;
mod glob;
mod planner;

pub use config::*;
pub use executor::{
    BenchExecutionResult, BenchOutcome, BenchmarkStatus, ExecutionConfig, Executor, OutputFormat,
    Report, ReportSummary, build_report, compute_statistics, format_duration, format_human_output,
    generate_csv_report, generate_json_report,
};
pub use glob::{Glob, GlobError};
pub use planner::{ExecutionPlan, MatchMode, Matcher, SelectionError, build_matcher, select};

use clap::{Args, Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tallybench_core::{Benchmark, flatten_all};
use tracing::info;

/// Exit status for usage errors (bad pattern, nothing matched)
pub const EXIT_USAGE: i32 = 64;

/// TallyBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "tallybench")]
#[command(author, version, about = "TallyBench - statistically rigorous microbenchmarks")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Selection for the default `run`
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output format: human, csv, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Warmup duration (e.g. "3s", "500ms")
    #[arg(long, global = true)]
    pub warmup: Option<String>,

    /// Measurement duration (e.g. "5s")
    #[arg(long, global = true)]
    pub measurement: Option<String>,

    /// Maximum measured runs per benchmark
    #[arg(long, global = true)]
    pub max_samples: Option<usize>,

    /// Bootstrap resamples
    #[arg(long, global = true)]
    pub resamples: Option<usize>,

    /// Confidence level for intervals (0 < level < 1)
    #[arg(long, global = true)]
    pub confidence: Option<f64>,

    /// Resampling RNG seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Record allocations (needs TrackingAllocator as #[global_allocator])
    #[arg(long, global = true)]
    pub track_allocations: bool,

    /// Pin the measuring thread to this CPU
    #[arg(long, global = true)]
    pub pin_cpu: Option<usize>,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0", global = true)]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true, global = true)]
    pub bench: bool,
}

/// Which benchmarks to act on
#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// How patterns are interpreted
    #[arg(long = "match", value_enum, default_value_t = MatchMode::Prefix)]
    pub match_mode: MatchMode,

    /// Benchmark name patterns (all benchmarks if omitted)
    pub patterns: Vec<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the selected benchmarks
    List(SelectArgs),
    /// Run the selected benchmarks (default)
    Run(SelectArgs),
    /// Print a default tally.toml
    Init,
}

/// Run the TallyBench CLI over `benchmarks`.
/// This is the main entry point for benchmark binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run(benchmarks: Vec<Benchmark>) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, benchmarks)
}

/// Run the TallyBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, benchmarks: Vec<Benchmark>) -> anyhow::Result<()> {
    // Initialize logging on stderr so stdout stays machine-readable
    let filter = if cli.verbose {
        "tallybench=debug"
    } else {
        "tallybench=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    // Discover tally.toml configuration (CLI flags override)
    let config = TallyConfig::discover().unwrap_or_default();

    match &cli.command {
        Some(Commands::Init) => {
            print!("{}", TallyConfig::default_toml());
            Ok(())
        }
        Some(Commands::List(select)) => {
            let plan = select_or_exit(select, benchmarks);
            list_benchmarks(&plan);
            Ok(())
        }
        Some(Commands::Run(select)) => {
            let plan = select_or_exit(select, benchmarks);
            run_benchmarks(&cli, &config, plan)
        }
        None => {
            let plan = select_or_exit(&cli.select, benchmarks);
            run_benchmarks(&cli, &config, plan)
        }
    }
}

/// Flatten and filter the suite.
pub fn plan_benchmarks(
    select: &SelectArgs,
    benchmarks: Vec<Benchmark>,
) -> Result<ExecutionPlan, SelectionError> {
    let matcher = build_matcher(select.match_mode, &select.patterns)?;
    planner::select(flatten_all(benchmarks), &matcher)
}

/// The two-line diagnostic printed for a selection error
pub fn usage_diagnostic(err: &SelectionError) -> String {
    format!("error: {err}\nrun with --help for usage information")
}

fn select_or_exit(select: &SelectArgs, benchmarks: Vec<Benchmark>) -> ExecutionPlan {
    match plan_benchmarks(select, benchmarks) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", usage_diagnostic(&e));
            std::process::exit(EXIT_USAGE);
        }
    }
}

fn list_benchmarks(plan: &ExecutionPlan) {
    for name in plan.names() {
        println!("{}", name);
    }
}

/// Build an ExecutionConfig by layering: tally.toml defaults → CLI overrides.
fn build_execution_config(cli: &Cli, config: &TallyConfig) -> anyhow::Result<ExecutionConfig> {
    let mut run = config.run_config()?;

    if let Some(ref warmup) = cli.warmup {
        run.warmup_time_ns = TallyConfig::parse_duration(warmup)?;
    }
    if let Some(ref measurement) = cli.measurement {
        run.measurement_time_ns = TallyConfig::parse_duration(measurement)?;
    }
    if let Some(max_samples) = cli.max_samples {
        run.max_samples = max_samples;
    }
    if cli.pin_cpu.is_some() {
        run.pin_cpu = cli.pin_cpu;
    }

    Ok(ExecutionConfig {
        run,
        track_allocations: cli.track_allocations || config.runner.track_allocations,
        show_progress: cli.output.is_some() || resolve_format(cli, config)? == OutputFormat::Human,
    })
}

/// Resampling settings: tally.toml `[analysis]`, then CLI overrides.
fn build_bootstrap_config(
    cli: &Cli,
    config: &TallyConfig,
) -> anyhow::Result<tallybench_stats::BootstrapConfig> {
    let mut bootstrap = config.bootstrap_config();
    if let Some(resamples) = cli.resamples {
        bootstrap.iterations = resamples;
    }
    if let Some(confidence) = cli.confidence {
        bootstrap.confidence_level = confidence;
    }
    if let Some(seed) = cli.seed {
        bootstrap.seed = seed;
    }

    if !(bootstrap.confidence_level > 0.0 && bootstrap.confidence_level < 1.0) {
        return Err(anyhow::anyhow!(
            "confidence level must lie strictly between 0 and 1, got {}",
            bootstrap.confidence_level
        ));
    }
    if bootstrap.iterations == 0 {
        return Err(anyhow::anyhow!("bootstrap resamples must be at least 1"));
    }
    Ok(bootstrap)
}

fn resolve_format(cli: &Cli, config: &TallyConfig) -> anyhow::Result<OutputFormat> {
    let format = cli.format.as_deref().unwrap_or(&config.output.format);
    format.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn run_benchmarks(cli: &Cli, config: &TallyConfig, plan: ExecutionPlan) -> anyhow::Result<()> {
    // Configure Rayon thread pool for statistics computation
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    if plan.benchmarks.is_empty() {
        eprintln!("No benchmarks found.");
        return Ok(());
    }

    let format = resolve_format(cli, config)?;
    let exec_config = build_execution_config(cli, config)?;
    let bootstrap = build_bootstrap_config(cli, config)?;

    if bootstrap.iterations < 100 {
        eprintln!(
            "Warning: {} resamples is very low; confidence intervals will be unreliable. \
             Use >= 1000 for meaningful results.",
            bootstrap.iterations
        );
    }

    info!(benchmarks = plan.benchmarks.len(), "running benchmarks");
    let start_time = Instant::now();

    // Measure sequentially, then analyze in parallel
    let track_allocations = exec_config.track_allocations;
    let mut executor = Executor::new(exec_config);
    let results = executor.execute(plan.benchmarks);
    let outcomes = compute_statistics(&results, &bootstrap);

    // Warn if allocation tracking is enabled but nothing was recorded
    if track_allocations
        && !outcomes.is_empty()
        && outcomes
            .iter()
            .all(|r| r.alloc_bytes == 0 && r.alloc_count == 0)
    {
        eprintln!(
            "Warning: allocation tracking enabled but all benchmarks reported 0 bytes allocated.\n\
             Ensure TrackingAllocator is set as #[global_allocator] in your benchmark binary."
        );
    }

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(outcomes, total_duration_ms);

    // Generate output
    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    // Write output
    let path = cli.output.clone().or_else(|| config.output.path.clone());
    if let Some(path) = path {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(&path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if report.has_crashes() {
        eprintln!("\nBenchmark(s) crashed during execution");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallybench_core::{Benchmarkable, bench, group};

    fn suite() -> Vec<Benchmark> {
        vec![group(
            "sum",
            vec![
                bench("small", Benchmarkable::action(|| (0..10u32).sum::<u32>())),
                bench("large", Benchmarkable::action(|| (0..1000u32).sum::<u32>())),
            ],
        )]
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tallybench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_is_run_with_prefix_patterns() {
        let cli = parse(&["sum/s"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.select.match_mode, MatchMode::Prefix);

        let plan = plan_benchmarks(&cli.select, suite()).unwrap();
        assert_eq!(plan.names(), ["sum/small"]);
    }

    #[test]
    fn test_list_subcommand_with_glob() {
        let cli = parse(&["list", "--match", "glob", "sum/*"]);
        let Some(Commands::List(select)) = cli.command else {
            panic!("expected list subcommand");
        };
        assert_eq!(select.match_mode, MatchMode::Glob);

        let plan = plan_benchmarks(&select, suite()).unwrap();
        assert_eq!(plan.names(), ["sum/small", "sum/large"]);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&["run", "--format", "csv", "--seed", "9", "sum"]);
        assert_eq!(cli.format.as_deref(), Some("csv"));
        assert_eq!(cli.seed, Some(9));

        let bootstrap = build_bootstrap_config(&cli, &TallyConfig::default()).unwrap();
        assert_eq!(bootstrap.seed, 9);
        assert_eq!(
            resolve_format(&cli, &TallyConfig::default()).unwrap(),
            OutputFormat::Csv
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&["--warmup", "10ms", "--max-samples", "12"]);
        let exec = build_execution_config(&cli, &TallyConfig::default()).unwrap();
        assert_eq!(exec.run.warmup_time_ns, 10_000_000);
        assert_eq!(exec.run.measurement_time_ns, 5_000_000_000);
        assert_eq!(exec.run.max_samples, 12);
    }

    #[test]
    fn test_selection_diagnostic() {
        let cli = parse(&["--match", "glob", "sum/[x"]);
        let err = plan_benchmarks(&cli.select, suite()).unwrap_err();
        let diagnostic = usage_diagnostic(&err);

        let lines: Vec<_> = diagnostic.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "error: unclosed character class in glob 'sum/[x'");
        assert_eq!(lines[1], "run with --help for usage information");
    }

    #[test]
    fn test_nothing_matched_is_an_error() {
        let cli = parse(&["smu"]);
        let err = plan_benchmarks(&cli.select, suite()).unwrap_err();
        assert!(matches!(err, SelectionError::NothingMatched { .. }));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let cli = parse(&["--format", "html"]);
        assert!(resolve_format(&cli, &TallyConfig::default()).is_err());
    }

    #[test]
    fn test_confidence_level_out_of_range_rejected() {
        for level in ["1.5", "0", "1", "NaN"] {
            let cli = parse(&["--confidence", level]);
            let err = build_bootstrap_config(&cli, &TallyConfig::default()).unwrap_err();
            assert!(err.to_string().contains("confidence level"), "{level}: {err}");
        }

        let cli = parse(&["--confidence", "0.99"]);
        let bootstrap = build_bootstrap_config(&cli, &TallyConfig::default()).unwrap();
        assert_eq!(bootstrap.confidence_level, 0.99);
    }

    #[test]
    fn test_bad_confidence_in_config_file_rejected() {
        let mut config = TallyConfig::default();
        config.analysis.confidence_level = 0.0;
        assert!(build_bootstrap_config(&parse(&[]), &config).is_err());
    }

    #[test]
    fn test_zero_resamples_rejected() {
        let cli = parse(&["--resamples", "0"]);
        assert!(build_bootstrap_config(&cli, &TallyConfig::default()).is_err());
    }
}
