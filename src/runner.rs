//! Thread lifecycle of a single run.
//!
//! 1. Build every worker. Configuration errors surface here, before any thread
//!    exists.
//! 2. Spawn one scoped thread per worker; all of them wait at a start gate.
//!    If a spawn fails, the gate opens with an abort, the threads already
//!    started return without touching the map, and the run fails.
//! 3. Open the gate once every thread has arrived. With a round budget every thread stops on its own;
//!    otherwise the coordinating thread sleeps for the duration and raises the
//!    stop flag.
//! 4. Join all threads and merge their reports.
//!
//! The coordinating thread never enters a region and never touches the map.

use std::panic;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::adapter::MapAdapter;
use crate::benchmark::HashMapBenchmark;
use crate::config::RunConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::ordering::STOP_STORE;
use crate::report::{RunReport, ThreadReport};
use crate::worker::{MixedWorker, StopSignal, thread_seed};

/// Run every configured thread against `bench`'s map once.
///
/// Thread ids are assigned sequentially across groups, in configuration order.
///
/// # Errors
///
/// [`crate::HarnessError::Configuration`] if `config` or any thread group is
/// invalid. No thread has been started in that case.
///
/// [`HarnessError::Spawn`] if a benchmark thread could not be created. The
/// threads started before it are released and joined without running.
///
/// # Panics
///
/// Re-raises the panic of any benchmark thread.
pub fn run<M: MapAdapter>(
    bench: &HashMapBenchmark<M>,
    config: &RunConfig,
) -> HarnessResult<RunReport> {
    config.validate()?;
    let workers = build_workers(bench, config)?;

    let stop_flag = AtomicBool::new(false);
    let stop: StopSignal<'_> = match config.rounds {
        Some(rounds) => StopSignal::Rounds(rounds),
        None => StopSignal::Flag(&stop_flag),
    };
    let gate = StartGate::default();
    let map: &M = bench.map();

    #[cfg(feature = "tracing")]
    tracing::info!(
        variant = %M::descriptor().name(),
        threads = workers.len(),
        duration_ms = config.duration_ms,
        rounds = ?config.rounds,
        "run starting"
    );

    let (reports, wall_time) = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers.len());

        for mut worker in workers {
            let id: u32 = worker.id();
            let gate: &StartGate = &gate;
            let stop: &StopSignal<'_> = &stop;

            let spawned = thread::Builder::new()
                .name(format!("bench-{id}"))
                .spawn_scoped(scope, move || {
                    if !gate.arrive() {
                        return None;
                    }
                    worker.run(map, stop);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(thread = worker.id(), "thread finished");
                    Some(worker.report())
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(thread = id, %err, "spawn failed, aborting run");
                    gate.open(false);
                    return Err(HarnessError::Spawn {
                        thread: id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        gate.wait_for(handles.len());
        gate.open(true);
        let start = Instant::now();

        if config.rounds.is_none() {
            thread::sleep(Duration::from_millis(config.duration_ms));
            stop_flag.store(true, STOP_STORE);
        }

        let reports: Vec<ThreadReport> = handles
            .into_iter()
            .filter_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect();

        Ok((reports, start.elapsed()))
    })?;

    let report = RunReport::new(reports, wall_time);
    #[cfg(feature = "tracing")]
    tracing::info!(
        total = report.summary.total,
        throughput = report.throughput,
        "run finished"
    );

    Ok(report)
}

/// Start barrier that can also be opened with an abort.
///
/// Unlike [`std::sync::Barrier`] it does not need every party to arrive, so
/// a run whose last spawn failed can still release the threads it started.
#[derive(Default)]
struct StartGate {
    state: Mutex<GateState>,
    changed: Condvar,
}

#[derive(Default)]
struct GateState {
    arrived: usize,
    go: Option<bool>,
}

impl StartGate {
    /// Announce arrival and block until the gate opens. Returns `false` on abort.
    fn arrive(&self) -> bool {
        let mut state = self.state.lock();
        state.arrived += 1;
        self.changed.notify_all();

        loop {
            if let Some(go) = state.go {
                return go;
            }
            self.changed.wait(&mut state);
        }
    }

    /// Block until `parties` threads have arrived.
    fn wait_for(&self, parties: usize) {
        let mut state = self.state.lock();
        while state.arrived < parties {
            self.changed.wait(&mut state);
        }
    }

    /// Release every waiting and future arrival.
    fn open(&self, go: bool) {
        self.state.lock().go = Some(go);
        self.changed.notify_all();
    }
}

fn build_workers<M: MapAdapter>(
    bench: &HashMapBenchmark<M>,
    config: &RunConfig,
) -> HarnessResult<Vec<MixedWorker>> {
    let mut workers = Vec::new();
    let mut id: u32 = 0;

    for group in &config.threads {
        for _ in 0..group.count {
            workers.push(bench.create_thread(id, group, thread_seed(config.seed, id))?);
            id += 1;
        }
    }

    Ok(workers)
}
