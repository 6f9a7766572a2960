//! Benchmarkable - a repeatable unit of timed work
//!
//! Two flavours:
//! - **pure**: a function applied to a fixed argument, with an explicit
//!   [`Evaluation`] strategy for its result
//! - **action**: a side-effecting closure, optionally fed fresh input from an
//!   untimed setup closure so no state leaks between runs
//!
//! Every result passes through [`std::hint::black_box`] so the optimizer
//! cannot turn the timed loop into "doing nothing".

use crate::measure::{Measured, TimingContext};
use std::hint::black_box;

/// What happens to a pure function's result inside the timed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Evaluation {
    /// The result is produced and kept alive; dropping it happens after the
    /// timer stops (once per batch of [`BATCH_SIZE`] iterations). Use when
    /// destruction is expensive and not of interest.
    Shallow,
    /// The result is produced and dropped inside the timed region, so its
    /// full lifecycle is measured.
    #[default]
    Deep,
}

/// Which flavour of work a [`Benchmarkable`] wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkableKind {
    /// Function applied to an argument
    Pure(Evaluation),
    /// Side-effecting action
    Action,
}

/// Most iterations whose inputs or outputs are held at once
///
/// Shallow evaluation and per-iteration setup are timed in batches of this
/// size, which bounds their memory regardless of the iteration count.
pub const BATCH_SIZE: u64 = 256;

type Routine = Box<dyn FnMut(u64, &TimingContext) -> Measured>;

/// A self-contained, repeatable unit of work
pub struct Benchmarkable {
    kind: BenchmarkableKind,
    routine: Routine,
}

impl std::fmt::Debug for Benchmarkable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmarkable")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Benchmarkable {
    /// Benchmark `f(&arg)`.
    pub fn pure<A, O, F>(f: F, arg: A, evaluation: Evaluation) -> Self
    where
        A: 'static,
        O: 'static,
        F: Fn(&A) -> O + 'static,
    {
        let routine: Routine = match evaluation {
            Evaluation::Deep => Box::new(move |iterations, ctx| {
                ctx.measure(iterations, || {
                    for _ in 0..iterations {
                        drop(black_box(f(black_box(&arg))));
                    }
                })
            }),
            Evaluation::Shallow => {
                let mut outputs = Vec::with_capacity(BATCH_SIZE as usize);
                Box::new(move |iterations, ctx| {
                    ctx.measure_batched(iterations, BATCH_SIZE, |n| {
                        let measured = ctx.measure(n, || {
                            for _ in 0..n {
                                outputs.push(black_box(f(black_box(&arg))));
                            }
                        });
                        // Drop the batch's outputs after its timer stopped
                        outputs.clear();
                        measured
                    })
                })
            }
        };

        Self {
            kind: BenchmarkableKind::Pure(evaluation),
            routine,
        }
    }

    /// Benchmark a side-effecting closure.
    pub fn action<O, F>(mut f: F) -> Self
    where
        F: FnMut() -> O + 'static,
    {
        Self {
            kind: BenchmarkableKind::Action,
            routine: Box::new(move |iterations, ctx| {
                ctx.measure(iterations, || {
                    for _ in 0..iterations {
                        black_box(f());
                    }
                })
            }),
        }
    }

    /// Benchmark `routine` on fresh inputs.
    ///
    /// `setup` runs once per iteration before the timer starts; only
    /// `routine` is timed. Inputs are prepared [`BATCH_SIZE`] at a time, so at
    /// most that many are alive whatever the iteration count.
    pub fn action_with_setup<I, O, S, R>(mut setup: S, mut routine: R) -> Self
    where
        I: 'static,
        S: FnMut() -> I + 'static,
        R: FnMut(I) -> O + 'static,
    {
        let mut inputs: Vec<I> = Vec::with_capacity(BATCH_SIZE as usize);
        Self {
            kind: BenchmarkableKind::Action,
            routine: Box::new(move |iterations, ctx| {
                ctx.measure_batched(iterations, BATCH_SIZE, |n| {
                    inputs.extend((0..n).map(|_| setup()));
                    ctx.measure(n, || {
                        for input in inputs.drain(..) {
                            black_box(routine(black_box(input)));
                        }
                    })
                })
            }),
        }
    }

    /// Execute the work `iterations` times and report what it consumed.
    ///
    /// Blocks until every iteration has completed.
    pub fn run(&mut self, iterations: u64, ctx: &TimingContext) -> Measured {
        (self.routine)(iterations, ctx)
    }

    /// Flavour of work
    pub fn kind(&self) -> BenchmarkableKind {
        self.kind
    }
}
