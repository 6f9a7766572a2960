//! Configuration loading from tally.toml
//!
//! TallyBench configuration can be specified in a `tally.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tallybench_core::{
    DEFAULT_GROWTH_FACTOR, DEFAULT_MAX_SAMPLES, DEFAULT_MIN_SAMPLES, RunConfig,
};
use tallybench_stats::{
    BootstrapConfig, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SEED,
};

/// Name of the configuration file searched for
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// TallyBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TallyConfig {
    /// Measurement configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Statistics configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Warmup duration before measurement (e.g., "3s")
    #[serde(default = "default_warmup")]
    pub warmup_time: String,
    /// Measurement duration (e.g., "5s")
    #[serde(default = "default_measurement")]
    pub measurement_time: String,
    /// Maximum number of measured runs per benchmark
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Minimum number of measured runs per benchmark
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Iteration count multiplier between runs
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,
    /// Record allocations (needs `TrackingAllocator` as the global allocator)
    #[serde(default)]
    pub track_allocations: bool,
    /// Pin the measuring thread to this CPU
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            max_samples: default_max_samples(),
            min_samples: default_min_samples(),
            growth_factor: default_growth_factor(),
            track_allocations: false,
            pin_cpu: None,
        }
    }
}

fn default_warmup() -> String {
    "3s".to_string()
}
fn default_measurement() -> String {
    "5s".to_string()
}
fn default_max_samples() -> usize {
    DEFAULT_MAX_SAMPLES
}
fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}
fn default_growth_factor() -> f64 {
    DEFAULT_GROWTH_FACTOR
}

/// Statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of bootstrap resamples
    #[serde(default = "default_bootstrap_iterations")]
    pub bootstrap_iterations: usize,
    /// Confidence level (e.g., 0.95 for 95%)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// RNG seed for resampling
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Resample on all cores
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bootstrap_iterations: default_bootstrap_iterations(),
            confidence_level: default_confidence_level(),
            seed: default_seed(),
            parallel: default_parallel(),
        }
    }
}

fn default_bootstrap_iterations() -> usize {
    DEFAULT_BOOTSTRAP_ITERATIONS
}
fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_parallel() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "csv", "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl TallyConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(dir)
    }

    /// Walk up from `dir` looking for `tally.toml`
    pub fn discover_from(mut dir: PathBuf) -> Option<Self> {
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Measurement settings described by the `[runner]` section
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let runner = &self.runner;
        if runner.growth_factor <= 1.0 {
            return Err(anyhow::anyhow!(
                "growth_factor must exceed 1.0, got {}",
                runner.growth_factor
            ));
        }
        Ok(RunConfig {
            warmup_time_ns: Self::parse_duration(&runner.warmup_time)?,
            measurement_time_ns: Self::parse_duration(&runner.measurement_time)?,
            max_samples: runner.max_samples,
            min_samples: runner.min_samples,
            growth_factor: runner.growth_factor,
            pin_cpu: runner.pin_cpu,
        })
    }

    /// Resampling settings described by the `[analysis]` section
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            iterations: self.analysis.bootstrap_iterations,
            confidence_level: self.analysis.confidence_level,
            parallel: self.analysis.parallel,
            force_bca: false,
            seed: self.analysis.seed,
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# TallyBench Configuration

[runner]
# Warmup duration before measurement
warmup_time = "3s"
# Measurement duration
measurement_time = "5s"
# Maximum measured runs per benchmark
max_samples = 300
# Minimum measured runs per benchmark
min_samples = 10
# Iteration count multiplier between runs (> 1.0)
growth_factor = 1.05
# Track memory allocations (requires TrackingAllocator as #[global_allocator])
track_allocations = false
# Pin the measuring thread to a CPU (uncomment to enable)
# pin_cpu = 0

[analysis]
# Bootstrap resamples for confidence intervals
bootstrap_iterations = 10000
# Confidence level (0.0 to 1.0)
confidence_level = 0.95
# Resampling RNG seed
seed = 2047983180
# Resample in parallel
parallel = true

[output]
# Default output format: human, csv, json
format = "human"
# Write the report to a file (uncomment to enable)
# path = "target/tallybench/results.csv"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if value < 0.0 || !value.is_finite() {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}
