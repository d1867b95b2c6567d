//! # `mapbench`
//!
//! Mixed-workload benchmark harness for concurrent maps and their memory
//! reclamation schemes.
//!
//! A benchmark run prefills a shared map on an isolated thread, then lets a
//! fixed pool of threads draw random keys and operations (insert, remove,
//! lookup) in batches. Every batch runs inside one safe-access region of the
//! backend's reclamation scheme. Each thread reports its successful operations
//! per kind; the reports are merged into a throughput figure per variant.
//!
//! ## Variants
//!
//! | Variant                       | Map                            | Reclamation              |
//! |-------------------------------|--------------------------------|--------------------------|
//! | `papaya_hash_map/seize`       | `papaya::HashMap`              | seize, default batch     |
//! | `papaya_hash_map/seize-32`    | `papaya::HashMap`              | seize, batch 32          |
//! | `papaya_hash_map/seize-128`   | `papaya::HashMap`              | seize, batch 128         |
//! | `skip_list/epoch`             | `crossbeam_skiplist::SkipList` | crossbeam-epoch          |
//! | `tree_index/sdd`              | `scc::TreeIndex`               | sdd                      |
//! | `dash_map/none`               | `dashmap::DashMap`             | none (shard locks)       |
//! | `locked_hash_map/none`        | `RwLock<HashMap>`              | none (one lock)          |
//!
//! ## Usage
//!
//! ```rust
//! use mapbench::{BenchmarkConfig, HASH_MAP, Registry, RunConfig, ThreadConfig};
//!
//! let registry = Registry::with_defaults();
//! let builder = registry.variant(HASH_MAP, "locked_hash_map/none").unwrap();
//!
//! let run = RunConfig {
//!     rounds: Some(10),
//!     threads: vec![ThreadConfig::mixed(2)],
//!     ..RunConfig::default()
//! };
//! let report = builder.execute(&BenchmarkConfig::default(), &run).unwrap();
//!
//! assert_eq!(report.runs.len(), 1);
//! assert_eq!(report.runs[0].threads.len(), 2);
//! ```
//!
//! ## Adding a backend
//!
//! Implement [`MapAdapter`] and register a [`TypedBuilder`] for it. The
//! region type is whatever token the backend's reclamation scheme hands out;
//! every map operation borrows it, so the map cannot be touched outside a
//! region.

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Hot-loop helpers are marked #[inline(always)] on purpose; the benches confirm it.
#![allow(clippy::inline_always)]

pub mod adapter;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod ordering;
pub mod prefill;
pub mod registry;
pub mod report;
pub mod runner;
pub mod worker;
pub mod workload;

mod tracing_helpers;

pub use adapter::{Descriptor, MapAdapter, ReclaimerDescriptor};
pub use benchmark::{Benchmark, HashMapBenchmark};
pub use config::{BenchmarkConfig, HarnessConfig, RunConfig, ThreadConfig};
pub use error::{HarnessError, HarnessResult};
pub use registry::{BenchmarkBuilder, HASH_MAP, Registry, TypedBuilder};
pub use report::{BenchmarkReport, RunReport, Summary, ThreadReport};
pub use tracing_helpers::init_tracing;
pub use worker::{MixedWorker, StopSignal, ThreadCounters};
pub use workload::{Operation, OperationBands};
