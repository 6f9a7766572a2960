//! TallyBench Example Benchmarks
//!
//! This example demonstrates TallyBench features and serves as a template for
//! creating your own benchmark suite.
//!
//! Run with:
//!   cargo run --release --example benchmarks                          # Run everything
//!   cargo run --release --example benchmarks -- --help                # Show all options
//!   cargo run --release --example benchmarks -- list                  # List benchmarks
//!   cargo run --release --example benchmarks -- sorting               # Prefix selection
//!   cargo run --release --example benchmarks -- --match glob '*/small' # Glob selection
//!   cargo run --release --example benchmarks -- --format csv -o out.csv

use std::collections::HashMap;
use tallybench::prelude::*;
use tallybench::{TrackingAllocator, powers};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn fib(n: u64) -> u64 {
    if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
}

// ============================================================================
// Pure functions
// ============================================================================

fn pure_benchmarks() -> Benchmark {
    group(
        "fib",
        vec![
            bench("10", Benchmarkable::pure(|n: &u64| fib(*n), 10, Evaluation::Deep)),
            bench("15", Benchmarkable::pure(|n: &u64| fib(*n), 15, Evaluation::Deep)),
            bench("20", Benchmarkable::pure(|n: &u64| fib(*n), 20, Evaluation::Deep)),
        ],
    )
}

// ============================================================================
// Collections
// ============================================================================

fn collection_benchmarks() -> Benchmark {
    let data: Vec<i64> = (0..1000).collect();
    let map: HashMap<u64, u64> = (0..1000).map(|i| (i, i * 2)).collect();

    group(
        "collections",
        vec![
            bench(
                "vec_sum",
                Benchmarkable::pure(|v: &Vec<i64>| v.iter().sum::<i64>(), data, Evaluation::Deep),
            ),
            bench(
                "hashmap_insert",
                Benchmarkable::action(|| {
                    let mut map = HashMap::new();
                    for i in 0..100u64 {
                        map.insert(i, i * 2);
                    }
                    map
                }),
            ),
            bench(
                "hashmap_lookup",
                Benchmarkable::pure(
                    |m: &HashMap<u64, u64>| (0..100u64).filter_map(|k| m.get(&k)).sum::<u64>(),
                    map,
                    Evaluation::Deep,
                ),
            ),
            // Outputs are dropped between batches, so the drop is not timed
            bench(
                "collect_shallow",
                Benchmarkable::pure(
                    |n: &usize| (0..*n).collect::<Vec<usize>>(),
                    256,
                    Evaluation::Shallow,
                ),
            ),
        ],
    )
}

// ============================================================================
// Sorting (fresh input per iteration)
// ============================================================================

fn sorting_benchmarks() -> Benchmark {
    group(
        "sorting",
        vec![
            bench(
                "small",
                Benchmarkable::action_with_setup(
                    || (0..100u32).rev().collect::<Vec<_>>(),
                    |mut v: Vec<u32>| {
                        v.sort();
                        v
                    },
                ),
            ),
            bench(
                "medium",
                Benchmarkable::action_with_setup(
                    || (0..10_000u32).rev().collect::<Vec<_>>(),
                    |mut v: Vec<u32>| {
                        v.sort_unstable();
                        v
                    },
                ),
            ),
        ],
    )
}

// ============================================================================
// Statistics
// ============================================================================

fn stats_benchmarks() -> Benchmark {
    let sample: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.37).sin()).collect();

    group(
        "stats",
        vec![
            bench(
                "powers",
                Benchmarkable::pure(
                    |s: &Vec<f64>| powers(4, s).kurtosis(),
                    sample.clone(),
                    Evaluation::Deep,
                ),
            ),
            bench(
                "sort",
                Benchmarkable::pure(|s: &Vec<f64>| tallybench::array::sort(s), sample, Evaluation::Deep),
            ),
        ],
    )
}

// ============================================================================
// Crash containment
// ============================================================================

fn crash_benchmarks() -> Benchmark {
    group(
        "crash_test",
        vec![
            bench(
                "will_panic",
                Benchmarkable::action(|| -> u64 { panic!("intentional panic for testing") }),
            ),
            bench("after_crash", Benchmarkable::action(|| 1 + 1)),
        ],
    )
}

fn main() -> anyhow::Result<()> {
    tallybench::run(vec![
        pure_benchmarks(),
        collection_benchmarks(),
        sorting_benchmarks(),
        stats_benchmarks(),
        crash_benchmarks(),
    ])
}
