//! Common test utilities: tracing setup and an instrumented mock map.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//!
//! #[test]
//! fn my_test() {
//!     common::init_tracing();
//!     let map = common::MockMap::<false>::create();
//!     // ...
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Filter directives (e.g., `mapbench=debug,mapbench::runner=trace`)
//! - `MAPBENCH_LOG_DIR`: Log directory (default: `logs/`)
//! - `MAPBENCH_LOG_CONSOLE`: Set to "0" to disable console output
//!
//! # Log Files
//!
//! Logs are written to `logs/mapbench.jsonl` as newline-delimited JSON (NDJSON):
//!
//! ```bash
//! # Runs of one variant
//! cat logs/mapbench.jsonl | jq 'select(.fields.variant == "skip_list/epoch")'
//!
//! # Show only errors
//! cat logs/mapbench.jsonl | jq 'select(.level == "ERROR")'
//! ```

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use mapbench::{Descriptor, MapAdapter, ReclaimerDescriptor};
use parking_lot::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

// =============================================================================
// Tracing
// =============================================================================

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Initialize the tracing subscriber with file and console logging.
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        setup_tracing();
    });
}

/// Configuration for tracing setup.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Log file name.
    pub log_file: String,
    /// Enable console output.
    pub console_enabled: bool,
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file: "mapbench.jsonl".to_string(),
            console_enabled: true,
            default_level: Level::INFO,
        }
    }
}

impl TracingConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("MAPBENCH_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if env::var("MAPBENCH_LOG_CONSOLE").is_ok_and(|v| v == "0") {
            config.console_enabled = false;
        }

        config
    }
}

fn make_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("{default_level}")))
}

#[expect(clippy::expect_used)]
fn setup_tracing() {
    let config = TracingConfig::from_env();

    std::fs::create_dir_all(&config.log_dir).expect("Failed to create log directory");

    let log_path = config.log_dir.join(&config.log_file);

    // Append mode: nextest runs tests in separate processes
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let console_layer = config.console_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .compact()
            .with_filter(make_filter(config.default_level))
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .json()
        .with_filter(make_filter(config.default_level));

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

// =============================================================================
// MockMap
// =============================================================================

/// Region lifecycle event recorded by [`MockMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionEvent {
    Enter { thread: ThreadId, name: Option<String> },
    Exit { thread: ThreadId },
}

/// Instrumented map.
///
/// With `ALWAYS = false` it behaves like a set. With `ALWAYS = true` every
/// operation succeeds, which makes attempted and counted operations equal.
///
/// Every region entry and exit is logged in order, and every operation checks
/// that it runs on the thread that owns the region.
#[derive(Debug, Default)]
pub struct MockMap<const ALWAYS: bool = false> {
    keys: Mutex<HashSet<u64>>,
    events: Mutex<Vec<RegionEvent>>,
    active: Mutex<HashMap<ThreadId, u32>>,
    inserts: AtomicU64,
    removes: AtomicU64,
    lookups: AtomicU64,
}

/// Region token of [`MockMap`].
pub struct MockRegion<'a, const ALWAYS: bool> {
    map: &'a MockMap<ALWAYS>,
    thread: ThreadId,
}

impl<const ALWAYS: bool> Drop for MockRegion<'_, ALWAYS> {
    fn drop(&mut self) {
        let mut active = self.map.active.lock();
        if let Some(count) = active.get_mut(&self.thread) {
            *count -= 1;
            if *count == 0 {
                active.remove(&self.thread);
            }
        }
        self.map.events.lock().push(RegionEvent::Exit {
            thread: self.thread,
        });
    }
}

impl<const ALWAYS: bool> MockMap<ALWAYS> {
    fn check_owner(region: &MockRegion<'_, ALWAYS>) {
        assert_eq!(
            region.thread,
            thread::current().id(),
            "region used on a thread that did not enter it"
        );
    }

    /// Snapshot of the region event log.
    pub fn events(&self) -> Vec<RegionEvent> {
        self.events.lock().clone()
    }

    /// Threads currently inside a region.
    pub fn active_threads(&self) -> Vec<ThreadId> {
        self.active.lock().keys().copied().collect()
    }

    /// Threads that ever entered a region.
    pub fn entered_threads(&self) -> HashSet<ThreadId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                RegionEvent::Enter { thread, .. } => Some(*thread),
                RegionEvent::Exit { .. } => None,
            })
            .collect()
    }

    /// Keys currently present.
    pub fn keys(&self) -> HashSet<u64> {
        self.keys.lock().clone()
    }

    /// Attempted (insert, remove, lookup) calls.
    pub fn attempts(&self) -> (u64, u64, u64) {
        (
            self.inserts.load(Ordering::Relaxed),
            self.removes.load(Ordering::Relaxed),
            self.lookups.load(Ordering::Relaxed),
        )
    }

    /// Sum of all attempted calls.
    pub fn total_attempts(&self) -> u64 {
        let (i, r, l) = self.attempts();
        i + r + l
    }
}

impl<const ALWAYS: bool> MapAdapter for MockMap<ALWAYS> {
    type Region<'a> = MockRegion<'a, ALWAYS>;

    fn create() -> Self {
        Self::default()
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: if ALWAYS { "mock_always" } else { "mock" },
            reclaimer: ReclaimerDescriptor::plain("none"),
        }
    }

    fn enter_region(&self) -> Self::Region<'_> {
        let current = thread::current();
        *self.active.lock().entry(current.id()).or_insert(0) += 1;
        self.events.lock().push(RegionEvent::Enter {
            thread: current.id(),
            name: current.name().map(str::to_string),
        });
        MockRegion {
            map: self,
            thread: current.id(),
        }
    }

    fn try_insert(&self, key: u64, region: &Self::Region<'_>) -> bool {
        Self::check_owner(region);
        self.inserts.fetch_add(1, Ordering::Relaxed);
        let inserted = self.keys.lock().insert(key);
        ALWAYS || inserted
    }

    fn try_remove(&self, key: u64, region: &Self::Region<'_>) -> bool {
        Self::check_owner(region);
        self.removes.fetch_add(1, Ordering::Relaxed);
        let removed = self.keys.lock().remove(&key);
        ALWAYS || removed
    }

    fn try_lookup(&self, key: u64, region: &Self::Region<'_>) -> bool {
        Self::check_owner(region);
        self.lookups.fetch_add(1, Ordering::Relaxed);
        ALWAYS || self.keys.lock().contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init() {
        init_tracing();
        tracing::info!("Tracing initialized successfully");
        tracing::debug!(key = 7, batch = 100, "Debug event");
    }

    #[test]
    fn mock_tracks_regions() {
        let map = MockMap::<false>::create();
        {
            let region = map.enter_region();
            assert!(map.try_insert(1, &region));
            assert_eq!(map.active_threads(), vec![thread::current().id()]);
        }
        assert!(map.active_threads().is_empty());
        assert_eq!(map.events().len(), 2);
        assert_eq!(map.attempts(), (1, 0, 0));
    }
}
