//! Benchmark Planner
//!
//! Builds the execution plan by matching flattened benchmark names.
//!
//! Matching modes:
//! - Prefix: a name is selected if it starts with any pattern; no patterns
//!   selects everything
//! - Glob: each pattern is compiled up front (failing on the first malformed
//!   one) and a name is selected if any pattern matches it
//!
//! Declaration order is preserved.

use crate::glob::{Glob, GlobError};
use clap::ValueEnum;
use tallybench_core::Benchmarkable;
use thiserror::Error;

/// How patterns are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MatchMode {
    /// Name starts with the pattern
    #[default]
    Prefix,
    /// Pattern is a path glob
    Glob,
}

/// Selection failures surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A glob did not compile
    #[error(transparent)]
    BadPattern(#[from] GlobError),

    /// Benchmarks exist but none matched; likely a typo
    #[error("no benchmarks match the given patterns: {}", patterns.join(", "))]
    NothingMatched {
        /// Patterns that were tried
        patterns: Vec<String>,
    },
}

/// Compiled predicate over benchmark names
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Match any of these prefixes (empty matches all)
    Prefix(Vec<String>),
    /// Match any of these globs
    Glob(Vec<Glob>),
}

impl Matcher {
    /// Whether `name` is selected
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Matcher::Prefix(prefixes) => {
                prefixes.is_empty() || prefixes.iter().any(|p| name.starts_with(p.as_str()))
            }
            Matcher::Glob(globs) => globs.iter().any(|g| g.is_match(name)),
        }
    }

    /// Patterns this matcher was built from
    pub fn patterns(&self) -> Vec<String> {
        match self {
            Matcher::Prefix(prefixes) => prefixes.clone(),
            Matcher::Glob(globs) => globs.iter().map(|g| g.as_str().to_string()).collect(),
        }
    }
}

/// Build a matcher, compiling globs eagerly
pub fn build_matcher(mode: MatchMode, patterns: &[String]) -> Result<Matcher, SelectionError> {
    match mode {
        MatchMode::Prefix => Ok(Matcher::Prefix(patterns.to_vec())),
        MatchMode::Glob => {
            let globs = patterns
                .iter()
                .map(|p| Glob::new(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Matcher::Glob(globs))
        }
    }
}

/// Execution plan for benchmarks
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Ordered list of benchmarks to run
    pub benchmarks: Vec<(String, Benchmarkable)>,
}

impl ExecutionPlan {
    /// Qualified names in run order
    pub fn names(&self) -> Vec<&str> {
        self.benchmarks.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Keep the benchmarks whose names `matcher` accepts.
///
/// An empty suite yields an empty plan. A non-empty suite of which nothing
/// matched is an error.
pub fn select(
    benchmarks: Vec<(String, Benchmarkable)>,
    matcher: &Matcher,
) -> Result<ExecutionPlan, SelectionError> {
    if benchmarks.is_empty() {
        return Ok(ExecutionPlan { benchmarks });
    }

    let selected: Vec<_> = benchmarks
        .into_iter()
        .filter(|(name, _)| matcher.is_match(name))
        .collect();

    if selected.is_empty() {
        return Err(SelectionError::NothingMatched {
            patterns: matcher.patterns(),
        });
    }

    Ok(ExecutionPlan {
        benchmarks: selected,
    })
}
