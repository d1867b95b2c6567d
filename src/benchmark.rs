//! The `hash_map` benchmark: one shared map, prefilled, hammered by mixed threads.

use crate::adapter::{Descriptor, MapAdapter};
use crate::config::{BenchmarkConfig, MIXED_THREAD, RunConfig, ThreadConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::prefill::prefill;
use crate::report::RunReport;
use crate::runner;
use crate::worker::MixedWorker;

/// A set-up benchmark, with the map type erased.
///
/// One instance corresponds to one freshly created and prefilled map.
pub trait Benchmark: Send + Sync {
    /// Backend and reclamation scheme under test.
    fn descriptor(&self) -> Descriptor;

    /// Benchmark-level options the map was set up with.
    fn config(&self) -> &BenchmarkConfig;

    /// Run the configured threads against the map once.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] if the run or a thread group is invalid.
    fn run(&self, run: &RunConfig) -> HarnessResult<RunReport>;
}

/// Mixed insert/remove/lookup benchmark over a map adapter `M`.
#[derive(Debug)]
pub struct HashMapBenchmark<M: MapAdapter> {
    map: M,
    config: BenchmarkConfig,
}

impl<M: MapAdapter> HashMapBenchmark<M> {
    /// Validate `config`, create the map and prefill it.
    ///
    /// Prefill has finished, and its thread has been joined, when this returns.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Configuration`] for invalid options.
    /// - [`HarnessError::Initialization`] if prefill fails.
    pub fn setup(config: BenchmarkConfig) -> HarnessResult<Self> {
        config.validate()?;

        let map = M::create();
        prefill(&map, config.key_range, config.prefill_count())?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            variant = %M::descriptor().name(),
            key_range = config.key_range,
            prefill = config.prefill_count(),
            "benchmark set up"
        );

        Ok(Self { map, config })
    }

    /// The shared map.
    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Build the worker for one thread of a group.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] for an unknown thread type or an
    /// invalid override.
    pub fn create_thread(
        &self,
        id: u32,
        thread: &ThreadConfig,
        seed: u64,
    ) -> HarnessResult<MixedWorker> {
        if thread.kind != MIXED_THREAD {
            return Err(HarnessError::configuration(
                "type",
                &thread.kind,
                "unknown thread type",
            ));
        }

        let settings = thread.settings(&self.config)?;
        Ok(MixedWorker::new(id, settings, seed))
    }
}

impl<M: MapAdapter> Benchmark for HashMapBenchmark<M> {
    fn descriptor(&self) -> Descriptor {
        M::descriptor()
    }

    fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    fn run(&self, run: &RunConfig) -> HarnessResult<RunReport> {
        runner::run(self, run)
    }
}
