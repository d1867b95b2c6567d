//! Per-thread execution loop.
//!
//! ```text
//! Idle -> [enter region -> (draw, classify, dispatch, simulate) x batch_size -> release] -> Idle
//! ```
//!
//! The stop condition is checked only between batches, so every batch runs to
//! completion inside exactly one region. Failed operations are normal outcomes:
//! they are not counted and never retried.

use std::hint::{black_box, spin_loop};
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::adapter::MapAdapter;
use crate::ordering::STOP_LOAD;
use crate::report::ThreadReport;
use crate::workload::{Operation, OperationBands, select_key};

/// Multiplier used to spread thread ids over the seed space.
const SEED_MULTIPLIER: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive a thread's seed from the run's base seed.
#[must_use]
#[inline]
pub fn thread_seed(base: u64, thread_id: u32) -> u64 {
    base ^ (u64::from(thread_id) + 1).wrapping_mul(SEED_MULTIPLIER)
}

// ============================================================================
//  Settings and counters
// ============================================================================

/// Resolved, validated per-thread parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Keys are drawn from `[0, key_range)`. Never zero.
    pub key_range: u64,

    /// Operation bands.
    pub bands: OperationBands,

    /// Operations per region. Never zero.
    pub batch_size: u32,

    /// Spin iterations of simulated work after each operation.
    pub workload: u32,
}

/// Successful operations of one thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadCounters {
    /// Inserts that added a key.
    pub insert: u64,
    /// Removes that deleted a key.
    pub remove: u64,
    /// Lookups that found a key.
    pub get: u64,
}

impl ThreadCounters {
    /// Count one successful operation.
    #[inline(always)]
    pub const fn record(&mut self, op: Operation) {
        match op {
            Operation::Insert => self.insert += 1,
            Operation::Remove => self.remove += 1,
            Operation::Lookup => self.get += 1,
        }
    }

    /// Add another set of counters.
    pub const fn merge(&mut self, other: &Self) {
        self.insert += other.insert;
        self.remove += other.remove;
        self.get += other.get;
    }

    /// Sum of all successful operations.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.insert + self.remove + self.get
    }
}

// ============================================================================
//  Workload hook
// ============================================================================

/// Called after every operation to simulate work between map accesses.
pub trait WorkloadHook: Send {
    /// Burn some time.
    fn simulate(&mut self);
}

/// No simulated work.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWorkload;

impl WorkloadHook for NoWorkload {
    #[inline(always)]
    fn simulate(&mut self) {}
}

/// Spin for a fixed number of iterations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinWorkload {
    iterations: u32,
}

impl SpinWorkload {
    /// Spin `iterations` times per call.
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl WorkloadHook for SpinWorkload {
    #[inline]
    fn simulate(&mut self) {
        for i in 0..self.iterations {
            black_box(i);
            spin_loop();
        }
    }
}

// ============================================================================
//  Stop signal
// ============================================================================

/// When a worker stops pulling batches. Owned by the runner.
#[derive(Debug, Clone, Copy)]
pub enum StopSignal<'a> {
    /// Stop once the flag is raised.
    Flag(&'a AtomicBool),

    /// Stop after this many batches.
    Rounds(u64),
}

impl StopSignal<'_> {
    /// Whether to stop after `completed` batches.
    #[inline]
    #[must_use]
    pub fn should_stop(&self, completed: u64) -> bool {
        match self {
            Self::Flag(flag) => flag.load(STOP_LOAD),
            Self::Rounds(rounds) => completed >= *rounds,
        }
    }
}

// ============================================================================
//  MixedWorker
// ============================================================================

/// One benchmark thread's state: bands, rng, counters.
///
/// Owned exclusively by its thread; the report is read once at the end.
pub struct MixedWorker<H = SpinWorkload> {
    id: u32,
    settings: WorkerSettings,
    rng: StdRng,
    hook: H,
    counters: ThreadCounters,
    runtime: Duration,
}

impl MixedWorker<SpinWorkload> {
    /// Worker whose hook spins `settings.workload` iterations.
    #[must_use]
    pub fn new(id: u32, settings: WorkerSettings, seed: u64) -> Self {
        let hook = SpinWorkload::new(settings.workload);
        Self::with_hook(id, settings, seed, hook)
    }
}

impl<H: WorkloadHook> MixedWorker<H> {
    /// Worker with an explicit workload hook.
    #[must_use]
    pub fn with_hook(id: u32, settings: WorkerSettings, seed: u64, hook: H) -> Self {
        Self {
            id,
            settings,
            rng: StdRng::seed_from_u64(seed),
            hook,
            counters: ThreadCounters::default(),
            runtime: Duration::ZERO,
        }
    }

    /// Thread id within the run.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Settings this worker runs with.
    #[must_use]
    pub const fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn counters(&self) -> &ThreadCounters {
        &self.counters
    }

    /// Run one batch inside one safe-access region.
    ///
    /// The region is released when this returns or unwinds.
    pub fn run_batch<M: MapAdapter>(&mut self, map: &M) {
        let bands: OperationBands = self.settings.bands;
        let key_range: u64 = self.settings.key_range;
        let mut batch = ThreadCounters::default();

        let region = map.enter_region();
        for _ in 0..self.settings.batch_size {
            let r: u64 = self.rng.next_u64();
            let key: u64 = select_key(r, key_range);
            let op: Operation = bands.classify(r);

            let succeeded: bool = match op {
                Operation::Insert => map.try_insert(key, &region),
                Operation::Remove => map.try_remove(key, &region),
                Operation::Lookup => map.try_lookup(key, &region),
            };
            if succeeded {
                batch.record(op);
            }

            self.hook.simulate();
        }
        drop(region);

        self.counters.merge(&batch);
    }

    /// Pull batches until `stop` says to stop.
    ///
    /// Returns the number of batches completed in this call.
    pub fn run<M: MapAdapter>(&mut self, map: &M, stop: &StopSignal<'_>) -> u64 {
        let start = Instant::now();
        let mut completed: u64 = 0;

        while !stop.should_stop(completed) {
            self.run_batch(map);
            completed += 1;
        }

        self.runtime += start.elapsed();
        completed
    }

    /// Final, immutable summary of this thread.
    #[must_use]
    pub fn report(&self) -> ThreadReport {
        ThreadReport::new(self.id, self.runtime, self.counters)
    }
}
