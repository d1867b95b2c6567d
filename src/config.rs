//! Benchmark and run configuration.
//!
//! A configuration file is a single JSON object; benchmark options and run
//! options sit side by side at the top level:
//!
//! ```json
//! {
//!     "key_range": 2048,
//!     "prefill": 205,
//!     "insert_ratio": 0.2,
//!     "remove_ratio": 0.2,
//!     "duration_ms": 500,
//!     "threads": [
//!         { "type": "mixed", "count": 4 },
//!         { "type": "mixed", "count": 2, "insert_ratio": 0.0, "remove_ratio": 0.0 }
//!     ]
//! }
//! ```
//!
//! Every option has a default, so `{}` is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};
use crate::worker::WorkerSettings;
use crate::workload::OperationBands;

/// Default size of the key universe.
pub const DEFAULT_KEY_RANGE: u64 = 2048;

/// Default insert and remove ratio.
pub const DEFAULT_RATIO: f64 = 0.2;

/// Default number of operations per safe-access region.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// The only thread type this benchmark knows.
pub const MIXED_THREAD: &str = "mixed";

// ============================================================================
//  BenchmarkConfig
// ============================================================================

/// Map-level options, shared read-only by every thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Keys are drawn from `[0, key_range)`.
    pub key_range: u64,

    /// Keys inserted before measurement. `None` means `key_range / 10`.
    pub prefill: Option<u64>,

    /// Share of draws that become inserts.
    pub insert_ratio: f64,

    /// Share of draws that become removes.
    pub remove_ratio: f64,

    /// Operations per safe-access region.
    pub batch_size: u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            key_range: DEFAULT_KEY_RANGE,
            prefill: None,
            insert_ratio: DEFAULT_RATIO,
            remove_ratio: DEFAULT_RATIO,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BenchmarkConfig {
    /// Number of keys to prefill: explicit value, or 10% of the key range.
    #[must_use]
    pub fn prefill_count(&self) -> u64 {
        self.prefill.unwrap_or(self.key_range / 10)
    }

    /// Check every constraint.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] naming the first violated option.
    pub fn validate(&self) -> HarnessResult<()> {
        check_key_range(self.key_range)?;
        check_batch_size(self.batch_size)?;
        OperationBands::new(self.insert_ratio, self.remove_ratio)?;

        let prefill: u64 = self.prefill_count();
        if prefill > self.key_range {
            return Err(HarnessError::configuration(
                "prefill",
                prefill,
                "must not exceed key_range",
            ));
        }

        Ok(())
    }
}

// ============================================================================
//  ThreadConfig
// ============================================================================

/// A group of identical benchmark threads.
///
/// Unset overrides fall back to the [`BenchmarkConfig`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Thread type; only `"mixed"` is recognised.
    #[serde(rename = "type")]
    pub kind: String,

    /// Number of threads in this group.
    pub count: u32,

    /// Per-thread key range override.
    pub key_range: Option<u64>,

    /// Per-thread insert ratio override.
    pub insert_ratio: Option<f64>,

    /// Per-thread remove ratio override.
    pub remove_ratio: Option<f64>,

    /// Per-thread batch size override.
    pub batch_size: Option<u32>,

    /// Spin iterations of simulated work after each operation.
    pub workload: u32,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self::mixed(1)
    }
}

impl ThreadConfig {
    /// A group of `count` mixed threads without overrides.
    #[must_use]
    pub fn mixed(count: u32) -> Self {
        Self {
            kind: MIXED_THREAD.to_string(),
            count,
            key_range: None,
            insert_ratio: None,
            remove_ratio: None,
            batch_size: None,
            workload: 0,
        }
    }

    /// Resolve overrides against the benchmark defaults and validate them.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] for an invalid resolved value.
    pub fn settings(&self, bench: &BenchmarkConfig) -> HarnessResult<WorkerSettings> {
        let key_range: u64 = self.key_range.unwrap_or(bench.key_range);
        check_key_range(key_range)?;

        let batch_size: u32 = self.batch_size.unwrap_or(bench.batch_size);
        check_batch_size(batch_size)?;

        let bands = OperationBands::new(
            self.insert_ratio.unwrap_or(bench.insert_ratio),
            self.remove_ratio.unwrap_or(bench.remove_ratio),
        )?;

        Ok(WorkerSettings {
            key_range,
            bands,
            batch_size,
            workload: self.workload,
        })
    }
}

// ============================================================================
//  RunConfig
// ============================================================================

/// How long to measure and with which threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Wall-clock budget per run, used when `rounds` is unset.
    pub duration_ms: u64,

    /// Fixed number of batches per thread instead of a time budget.
    pub rounds: Option<u64>,

    /// How many times to repeat the run, each on a fresh map.
    pub runs: u32,

    /// Base seed; each thread mixes its id into it.
    pub seed: u64,

    /// Thread groups.
    pub threads: Vec<ThreadConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            rounds: None,
            runs: 1,
            seed: 0,
            threads: vec![ThreadConfig::mixed(4)],
        }
    }
}

impl RunConfig {
    /// Total number of threads over all groups.
    #[must_use]
    pub fn thread_count(&self) -> u32 {
        self.threads.iter().map(|group| group.count).sum()
    }

    /// Check run-level constraints. Thread settings are checked when the
    /// threads are created.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] naming the violated option.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.runs == 0 {
            return Err(HarnessError::configuration("runs", 0, "must be positive"));
        }

        match self.rounds {
            Some(0) => {
                return Err(HarnessError::configuration("rounds", 0, "must be positive"));
            }
            None if self.duration_ms == 0 => {
                return Err(HarnessError::configuration(
                    "duration_ms",
                    0,
                    "must be positive when rounds is unset",
                ));
            }
            _ => {}
        }

        if self.threads.is_empty() {
            return Err(HarnessError::configuration(
                "threads",
                "[]",
                "at least one thread group is required",
            ));
        }

        if let Some(group) = self.threads.iter().find(|group| group.count == 0) {
            return Err(HarnessError::configuration(
                "count",
                group.count,
                "thread group must contain at least one thread",
            ));
        }

        Ok(())
    }
}

// ============================================================================
//  HarnessConfig
// ============================================================================

/// Everything a configuration file can hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Map-level options.
    #[serde(flatten)]
    pub benchmark: BenchmarkConfig,

    /// Run-level options.
    #[serde(flatten)]
    pub run: RunConfig,
}

impl HarnessConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`] if the input is not valid JSON of this shape.
    pub fn from_json_str(input: &str) -> HarnessResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> HarnessResult<Self> {
        let input = std::fs::read_to_string(path)
            .map_err(|err| HarnessError::Config(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&input)
    }

    /// Validate both halves.
    ///
    /// # Errors
    ///
    /// The first [`HarnessError::Configuration`] found.
    pub fn validate(&self) -> HarnessResult<()> {
        self.benchmark.validate()?;
        self.run.validate()
    }
}

fn check_key_range(key_range: u64) -> HarnessResult<()> {
    if key_range == 0 {
        return Err(HarnessError::configuration(
            "key_range",
            key_range,
            "must be positive",
        ));
    }
    Ok(())
}

fn check_batch_size(batch_size: u32) -> HarnessResult<()> {
    if batch_size == 0 {
        return Err(HarnessError::configuration(
            "batch_size",
            batch_size,
            "must be positive",
        ));
    }
    Ok(())
}
