//! Per-thread summaries and their merge into run and benchmark reports.
//!
//! A [`ThreadReport`] is produced once, after its thread stopped, and is never
//! modified afterwards. Merging is plain arithmetic over finished reports:
//! counts are summed and the run time is the longest thread's run time.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::adapter::Descriptor;
use crate::worker::ThreadCounters;

/// Durations are reported in milliseconds, with sub-millisecond precision.
fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Immutable summary of one benchmark thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreadReport {
    /// Thread id within the run.
    pub id: u32,

    /// Time spent inside the execution loop.
    #[serde(rename = "runtime_ms", serialize_with = "as_millis")]
    pub runtime: Duration,

    /// Successful inserts.
    pub insert: u64,

    /// Successful removes.
    pub remove: u64,

    /// Successful lookups.
    pub get: u64,

    /// `insert + remove + get`.
    pub total: u64,
}

impl ThreadReport {
    /// Freeze a thread's counters.
    #[must_use]
    pub const fn new(id: u32, runtime: Duration, counters: ThreadCounters) -> Self {
        Self {
            id,
            runtime,
            insert: counters.insert,
            remove: counters.remove,
            get: counters.get,
            total: counters.total(),
        }
    }
}

/// Totals over a set of thread reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of merged threads.
    pub threads: u32,

    /// Longest per-thread runtime.
    #[serde(rename = "runtime_ms", serialize_with = "as_millis")]
    pub runtime: Duration,

    /// Sum of successful inserts.
    pub insert: u64,

    /// Sum of successful removes.
    pub remove: u64,

    /// Sum of successful lookups.
    pub get: u64,

    /// Sum of per-thread totals.
    pub total: u64,
}

impl Summary {
    /// Merge thread reports.
    #[must_use]
    pub fn merge<'a>(reports: impl IntoIterator<Item = &'a ThreadReport>) -> Self {
        reports.into_iter().fold(Self::default(), |mut acc, report| {
            acc.add(report);
            acc
        })
    }

    /// Fold one more thread into the totals.
    pub fn add(&mut self, report: &ThreadReport) {
        self.threads += 1;
        self.runtime = self.runtime.max(report.runtime);
        self.insert += report.insert;
        self.remove += report.remove;
        self.get += report.get;
        self.total += report.total;
    }
}

/// Outcome of one run: every thread's report plus their merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Wall-clock time from the start barrier to the last join.
    #[serde(rename = "wall_time_ms", serialize_with = "as_millis")]
    pub wall_time: Duration,

    /// Merged totals.
    pub summary: Summary,

    /// Successful operations per second of wall-clock time.
    pub throughput: f64,

    /// Per-thread reports, ordered by thread id.
    pub threads: Vec<ThreadReport>,
}

impl RunReport {
    /// Merge `threads` and compute throughput over `wall_time`.
    #[must_use]
    pub fn new(mut threads: Vec<ThreadReport>, wall_time: Duration) -> Self {
        threads.sort_by_key(|report| report.id);
        let summary = Summary::merge(&threads);

        let seconds: f64 = wall_time.as_secs_f64();
        #[expect(clippy::cast_precision_loss, reason = "operation counts stay far below 2^52")]
        let throughput: f64 = if seconds > 0.0 {
            summary.total as f64 / seconds
        } else {
            0.0
        };

        Self {
            wall_time,
            summary,
            throughput,
            threads,
        }
    }
}

/// Every run of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    /// Variant name, `<backend>/<reclaimer label>`.
    pub name: String,

    /// Backend and reclamation scheme.
    pub descriptor: Descriptor,

    /// One entry per run, in execution order.
    pub runs: Vec<RunReport>,
}

impl BenchmarkReport {
    /// Empty report for a variant.
    #[must_use]
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            name: descriptor.name(),
            descriptor,
            runs: Vec::new(),
        }
    }

    /// Mean throughput over all runs.
    #[must_use]
    pub fn mean_throughput(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        #[expect(clippy::cast_precision_loss, reason = "run counts are small")]
        let runs = self.runs.len() as f64;
        self.runs.iter().map(|run| run.throughput).sum::<f64>() / runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: u32, millis: u64, insert: u64, remove: u64, get: u64) -> ThreadReport {
        ThreadReport::new(
            id,
            Duration::from_millis(millis),
            ThreadCounters {
                insert,
                remove,
                get,
            },
        )
    }

    #[test]
    fn thread_total_is_sum_of_counts() {
        let r = report(2, 10, 3, 4, 5);
        assert_eq!(r.total, 12);
        assert_eq!(r.id, 2);
    }

    #[test]
    fn merge_sums_counts_and_keeps_longest_runtime() {
        let reports = [report(0, 10, 1, 2, 3), report(1, 30, 4, 5, 6)];
        let summary = Summary::merge(&reports);

        assert_eq!(summary.threads, 2);
        assert_eq!(summary.runtime, Duration::from_millis(30));
        assert_eq!(summary.insert, 5);
        assert_eq!(summary.remove, 7);
        assert_eq!(summary.get, 9);
        assert_eq!(summary.total, 21);
    }

    #[test]
    fn run_report_sorts_threads_and_computes_throughput() {
        let run = RunReport::new(
            vec![report(1, 500, 10, 0, 0), report(0, 500, 0, 0, 10)],
            Duration::from_millis(500),
        );

        assert_eq!(run.threads[0].id, 0);
        assert_eq!(run.summary.total, 20);
        assert!((run.throughput - 40.0).abs() < 1e-9);
    }

    #[test]
    fn zero_wall_time_has_zero_throughput() {
        let run = RunReport::new(vec![report(0, 0, 1, 1, 1)], Duration::ZERO);
        assert!(run.throughput.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_runtime_in_millis() {
        let json = serde_json::to_value(report(0, 1500, 1, 0, 0)).unwrap();
        assert_eq!(json["runtime_ms"], 1500.0);
        assert_eq!(json["total"], 1);
    }
}
