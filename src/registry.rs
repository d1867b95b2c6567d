//! Catalogue of runnable benchmarks.
//!
//! A registry maps a benchmark name to its variants. Each variant is one
//! (backend × reclamation scheme) combination, built on demand from a
//! [`BenchmarkConfig`]. The only benchmark is [`HASH_MAP`].

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::adapter::{
    Descriptor, EpochSkipList, LockedHashMap, MapAdapter, PapayaHashMap, SddTreeIndex,
    ShardedDashMap,
};
use crate::benchmark::{Benchmark, HashMapBenchmark};
use crate::config::{BenchmarkConfig, RunConfig};
use crate::error::{HarnessError, HarnessResult};
use crate::report::BenchmarkReport;

/// Registry name of the mixed-workload map benchmark.
pub const HASH_MAP: &str = "hash_map";

/// Builds fresh instances of one benchmark variant.
pub trait BenchmarkBuilder: Send + Sync {
    /// Backend and reclamation scheme of the variant.
    fn descriptor(&self) -> Descriptor;

    /// Create and prefill a new map.
    ///
    /// # Errors
    ///
    /// Configuration or initialization failures from setup.
    fn build(&self, config: &BenchmarkConfig) -> HarnessResult<Box<dyn Benchmark>>;

    /// Run `run.runs` times, each on a freshly built map.
    ///
    /// # Errors
    ///
    /// The first setup or configuration failure; no further runs happen.
    fn execute(
        &self,
        config: &BenchmarkConfig,
        run: &RunConfig,
    ) -> HarnessResult<BenchmarkReport> {
        run.validate()?;

        let mut report = BenchmarkReport::new(self.descriptor());
        #[cfg(feature = "tracing")]
        tracing::debug!(variant = %report.name, runs = run.runs, "executing variant");

        for _ in 0..run.runs {
            let bench = self.build(config)?;
            report.runs.push(bench.run(run)?);
        }

        Ok(report)
    }
}

/// [`BenchmarkBuilder`] for [`HashMapBenchmark<M>`].
pub struct TypedBuilder<M>(PhantomData<fn() -> M>);

impl<M> TypedBuilder<M> {
    /// Builder for adapter `M`.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<M> Default for TypedBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MapAdapter> BenchmarkBuilder for TypedBuilder<M> {
    fn descriptor(&self) -> Descriptor {
        M::descriptor()
    }

    fn build(&self, config: &BenchmarkConfig) -> HarnessResult<Box<dyn Benchmark>> {
        Ok(Box::new(HashMapBenchmark::<M>::setup(config.clone())?))
    }
}

/// Every (backend × reclamation scheme) combination of [`HASH_MAP`].
#[must_use]
pub fn hash_map_variants() -> Vec<Box<dyn BenchmarkBuilder>> {
    vec![
        Box::new(TypedBuilder::<PapayaHashMap>::new()),
        Box::new(TypedBuilder::<PapayaHashMap<32>>::new()),
        Box::new(TypedBuilder::<PapayaHashMap<128>>::new()),
        Box::new(TypedBuilder::<EpochSkipList>::new()),
        Box::new(TypedBuilder::<SddTreeIndex>::new()),
        Box::new(TypedBuilder::<ShardedDashMap>::new()),
        Box::new(TypedBuilder::<LockedHashMap>::new()),
    ]
}

/// Named benchmarks and their variants.
#[derive(Default)]
pub struct Registry {
    benchmarks: BTreeMap<&'static str, Vec<Box<dyn BenchmarkBuilder>>>,
}

impl Registry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in benchmark.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        register_hash_map_benchmark(&mut registry);
        registry
    }

    /// Add a variant under `name`.
    pub fn register(&mut self, name: &'static str, builder: Box<dyn BenchmarkBuilder>) {
        self.benchmarks.entry(name).or_default().push(builder);
    }

    /// Registered benchmark names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.benchmarks.keys().copied()
    }

    /// All variants of `name`, in registration order.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownBenchmark`] if nothing is registered under `name`.
    pub fn benchmark(&self, name: &str) -> HarnessResult<&[Box<dyn BenchmarkBuilder>]> {
        self.benchmarks
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| HarnessError::UnknownBenchmark(name.to_string()))
    }

    /// The variant of `name` whose descriptor name is `variant`.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownBenchmark`] or [`HarnessError::UnknownVariant`].
    pub fn variant(&self, name: &str, variant: &str) -> HarnessResult<&dyn BenchmarkBuilder> {
        self.benchmark(name)?
            .iter()
            .find(|builder| builder.descriptor().name() == variant)
            .map(|builder| builder.as_ref())
            .ok_or_else(|| HarnessError::UnknownVariant(variant.to_string()))
    }
}

/// Register every [`HASH_MAP`] variant.
pub fn register_hash_map_benchmark(registry: &mut Registry) {
    for builder in hash_map_variants() {
        registry.register(HASH_MAP, builder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThreadConfig;

    #[test]
    fn defaults_hold_hash_map() {
        let registry = Registry::with_defaults();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![HASH_MAP]);
        assert_eq!(registry.benchmark(HASH_MAP).unwrap().len(), 7);
    }

    #[test]
    fn variant_names_are_unique() {
        let registry = Registry::with_defaults();
        let mut names: Vec<String> = registry
            .benchmark(HASH_MAP)
            .unwrap()
            .iter()
            .map(|b| b.descriptor().name())
            .collect();
        let len = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn lookup_by_variant_name() {
        let registry = Registry::with_defaults();
        let builder = registry.variant(HASH_MAP, "skip_list/epoch").unwrap();
        assert_eq!(builder.descriptor().backend, "skip_list");

        assert!(matches!(
            registry.variant(HASH_MAP, "skip_list/hazard"),
            Err(HarnessError::UnknownVariant(_))
        ));
        assert!(matches!(
            registry.benchmark("queue"),
            Err(HarnessError::UnknownBenchmark(_))
        ));
    }

    #[test]
    fn execute_repeats_runs() {
        let registry = Registry::with_defaults();
        let builder = registry.variant(HASH_MAP, "locked_hash_map/none").unwrap();
        let run = RunConfig {
            rounds: Some(3),
            runs: 2,
            threads: vec![ThreadConfig::mixed(2)],
            ..RunConfig::default()
        };

        let report = builder.execute(&BenchmarkConfig::default(), &run).unwrap();
        assert_eq!(report.name, "locked_hash_map/none");
        assert_eq!(report.runs.len(), 2);
        assert!(report.runs.iter().all(|r| r.threads.len() == 2));
    }
}
