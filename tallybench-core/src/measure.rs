//! High-Precision Timing
//!
//! Uses RDTSCP on x86_64 and CNTVCT_EL0 on AArch64 for minimal overhead
//! cycle counting alongside `std::time::Instant` wall-clock time and
//! per-process CPU time.
//!
//! [`TimingContext`] is the process-scoped timing state: it is initialized
//! once (calibrating clock resolution and timer overhead) and handed by
//! reference to everything that measures.

use crate::allocator::{current_allocation, reset_allocation_counter};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// ─── Inline cycle counter helpers ────────────────────────────────────────────

/// Read the CPU cycle/tick counter (platform-specific).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on all x86_64 CPUs since ~2006.
    // It waits for all prior instructions to complete before reading.
    unsafe {
        let mut _aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut _aux)
    }
}

/// Read the virtual counter timer on AArch64 (comparable to x86 TSC).
#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides real cycle counters.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// CPU time consumed by this process, in nanoseconds.
#[cfg(unix)]
#[inline]
pub fn cpu_time_ns() -> u64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: ts is a valid, writable timespec.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        return 0;
    }
    (ts.tv_sec as u64) * 1_000_000_000 + ts.tv_nsec as u64
}

/// CPU time is not available on this platform; always 0.
#[cfg(not(unix))]
#[inline]
pub fn cpu_time_ns() -> u64 {
    0
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Timer for measuring one batch of iterations
pub struct Timer {
    start: std::time::Instant,
    cycles_start: u64,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        let cycles_start = read_cycles();
        Self {
            start: std::time::Instant::now(),
            cycles_start,
        }
    }

    /// Stop the timer and return elapsed nanoseconds and cycles
    #[inline(always)]
    pub fn stop(&self) -> (u64, u64) {
        let nanos = self.start.elapsed().as_nanos() as u64;
        let cycles = read_cycles().saturating_sub(self.cycles_start);
        (nanos, cycles)
    }
}

// ─── Measured ────────────────────────────────────────────────────────────────

/// Resources consumed by one run of `iterations` iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Measured {
    /// Iterations executed in this run
    pub iterations: u64,
    /// Wall-clock nanoseconds for the whole run
    pub time_ns: u64,
    /// CPU cycles for the whole run (0 without a cycle counter)
    pub cycles: u64,
    /// Process CPU nanoseconds for the whole run
    pub cpu_time_ns: u64,
    /// Bytes allocated during the run (0 unless tracking)
    pub alloc_bytes: u64,
    /// Allocations made during the run (0 unless tracking)
    pub alloc_count: u64,
}

impl Measured {
    /// Wall-clock nanoseconds per iteration
    pub fn time_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.time_ns as f64 / self.iterations as f64
        }
    }
}

// ─── Timing context ──────────────────────────────────────────────────────────

/// Empty timer runs averaged for the overhead estimate
const CALIBRATION_ROUNDS: usize = 10_000;

/// Clock ticks observed for the resolution estimate
const RESOLUTION_ROUNDS: usize = 100;

/// Process-scoped timing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingContext {
    resolution_ns: u64,
    overhead_ns: f64,
    track_allocations: bool,
}

impl TimingContext {
    /// Calibrate the clock. Call once before any measurement.
    pub fn initialize() -> Self {
        let resolution_ns = measure_resolution();
        let overhead_ns = measure_overhead();
        debug!(resolution_ns, overhead_ns, "clock calibrated");
        Self {
            resolution_ns,
            overhead_ns,
            track_allocations: false,
        }
    }

    /// Record allocations made inside timed regions.
    ///
    /// Counts are only non-zero when [`crate::TrackingAllocator`] is the
    /// global allocator.
    pub fn with_allocation_tracking(mut self, track: bool) -> Self {
        self.track_allocations = track;
        self
    }

    /// Smallest observed non-zero clock step, in nanoseconds
    pub fn resolution_ns(&self) -> u64 {
        self.resolution_ns
    }

    /// Mean cost of an empty start/stop pair, in nanoseconds
    pub fn overhead_ns(&self) -> f64 {
        self.overhead_ns
    }

    /// Whether allocations are recorded
    pub fn tracks_allocations(&self) -> bool {
        self.track_allocations
    }

    /// Shortest run worth timing: long enough that clock granularity
    /// contributes under 0.1% error.
    pub fn min_run_time(&self) -> Duration {
        Duration::from_nanos(self.resolution_ns.max(1) * 1_000)
    }

    /// Time `body`, which is expected to execute `iterations` iterations.
    #[inline]
    pub fn measure<F: FnOnce()>(&self, iterations: u64, body: F) -> Measured {
        if self.track_allocations {
            reset_allocation_counter();
        }

        let cpu_start = cpu_time_ns();
        let timer = Timer::start();
        body();
        let (time_ns, cycles) = timer.stop();
        let cpu_time_ns = cpu_time_ns().saturating_sub(cpu_start);

        let (alloc_bytes, alloc_count) = if self.track_allocations {
            current_allocation()
        } else {
            (0, 0)
        };

        Measured {
            iterations,
            time_ns,
            cycles,
            cpu_time_ns,
            alloc_bytes,
            alloc_count,
        }
    }

    /// Time `iterations` iterations as a sequence of batches of at most
    /// `batch_size`.
    ///
    /// `run_batch(n)` must time exactly one batch of `n` iterations with
    /// [`TimingContext::measure`]; it may do untimed work (setup, dropping
    /// outputs) around that call. Batch results are summed into one
    /// [`Measured`] and the calibrated timer overhead is removed from each
    /// batch, so splitting a run does not inflate its per-iteration cost.
    pub fn measure_batched<F>(&self, iterations: u64, batch_size: u64, mut run_batch: F) -> Measured
    where
        F: FnMut(u64) -> Measured,
    {
        let batch_size = batch_size.max(1);
        let overhead_ns = self.overhead_ns.round() as u64;
        let mut total = Measured {
            iterations,
            ..Measured::default()
        };

        let mut remaining = iterations;
        while remaining > 0 {
            let n = remaining.min(batch_size);
            let batch = run_batch(n);
            total.time_ns = total
                .time_ns
                .saturating_add(batch.time_ns.saturating_sub(overhead_ns));
            total.cycles = total.cycles.saturating_add(batch.cycles);
            total.cpu_time_ns = total.cpu_time_ns.saturating_add(batch.cpu_time_ns);
            total.alloc_bytes = total.alloc_bytes.saturating_add(batch.alloc_bytes);
            total.alloc_count = total.alloc_count.saturating_add(batch.alloc_count);
            remaining -= n;
        }
        total
    }
}

fn measure_resolution() -> u64 {
    let mut best = u64::MAX;
    for _ in 0..RESOLUTION_ROUNDS {
        let a = std::time::Instant::now();
        let mut b = std::time::Instant::now();
        while b == a {
            b = std::time::Instant::now();
        }
        best = best.min((b - a).as_nanos() as u64);
    }
    best.max(1)
}

fn measure_overhead() -> f64 {
    let total: u64 = (0..CALIBRATION_ROUNDS)
        .map(|_| {
            let timer = Timer::start();
            timer.stop().0
        })
        .sum();
    total as f64 / CALIBRATION_ROUNDS as f64
}

/// Set CPU affinity to pin the current thread to a specific core
///
/// This improves TSC stability by avoiding core migrations.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// CPU pinning is not supported on this platform; always succeeds.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let (nanos, _cycles) = timer.stop();

        assert!(nanos >= 5_000_000);
    }

    #[test]
    fn test_cycle_counter() {
        if HAS_CYCLE_COUNTER {
            let a = read_cycles();
            let b = read_cycles();
            assert!(b >= a, "cycle counter should be monotonic");
        }
    }

    #[test]
    fn test_calibration() {
        let ctx = TimingContext::initialize();
        assert!(ctx.resolution_ns() >= 1);
        assert!(ctx.overhead_ns() >= 0.0);
        assert!(ctx.min_run_time() >= Duration::from_nanos(1_000));
        assert!(!ctx.tracks_allocations());
    }

    #[test]
    fn test_measure_records_iterations() {
        let ctx = TimingContext::initialize();
        let m = ctx.measure(7, || std::thread::sleep(Duration::from_millis(2)));

        assert_eq!(m.iterations, 7);
        assert!(m.time_ns >= 1_000_000);
        assert!(m.time_per_iteration() > 0.0);
        assert_eq!(m.alloc_count, 0);
    }

    #[test]
    fn test_measure_batched_splits_and_removes_overhead() {
        let ctx = TimingContext {
            resolution_ns: 1,
            overhead_ns: 10.0,
            track_allocations: false,
        };
        let mut sizes = Vec::new();
        let m = ctx.measure_batched(1_000, 300, |n| {
            sizes.push(n);
            Measured {
                iterations: n,
                time_ns: 100,
                cycles: 7,
                ..Measured::default()
            }
        });

        assert_eq!(sizes, [300, 300, 300, 100]);
        assert_eq!(m.iterations, 1_000);
        assert_eq!(m.time_ns, 4 * 90);
        assert_eq!(m.cycles, 28);
    }

    #[test]
    fn test_measure_batched_overhead_saturates() {
        let ctx = TimingContext {
            resolution_ns: 1,
            overhead_ns: 50.0,
            track_allocations: false,
        };
        let m = ctx.measure_batched(3, 1, |n| Measured {
            iterations: n,
            time_ns: 20,
            ..Measured::default()
        });
        assert_eq!(m.time_ns, 0);

        let empty = ctx.measure_batched(0, 8, |_| unreachable!("no batches for zero iterations"));
        assert_eq!(empty, Measured::default());
    }

    #[test]
    fn test_time_per_iteration_zero() {
        assert_eq!(Measured::default().time_per_iteration(), 0.0);
    }
}
