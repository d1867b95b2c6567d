//! The capability contract a concurrent map backend must satisfy.
//!
//! The workload engine only ever talks to a map through [`MapAdapter`]. Every
//! operation takes a reference to the backend's region token, so a map cannot
//! be touched outside a safe-access region: the borrow checker enforces it.
//!
//! | Adapter                        | Backend                          | Reclamation        |
//! |--------------------------------|----------------------------------|--------------------|
//! | [`PapayaHashMap`]              | `papaya::HashMap`                | seize (hyaline)    |
//! | [`EpochSkipList`]              | `crossbeam_skiplist::SkipList`   | crossbeam-epoch    |
//! | [`SddTreeIndex`]               | `scc::TreeIndex`                 | sdd                |
//! | [`ShardedDashMap`]             | `dashmap::DashMap`               | none (shard locks) |
//! | [`LockedHashMap`]              | `RwLock<HashMap>`                | none (one lock)    |

use serde::Serialize;

mod dash_map;
mod locked;
mod papaya_map;
mod skip_list;
mod tree_index;

pub use dash_map::ShardedDashMap;
pub use locked::LockedHashMap;
pub use papaya_map::PapayaHashMap;
pub use skip_list::EpochSkipList;
pub use tree_index::SddTreeIndex;

/// A concurrent map backend as seen by the benchmark.
///
/// Keys are `u64`; what is stored alongside a key is up to the adapter and is
/// never observed by the harness. Implementations must
/// make each operation a single backend call where the backend allows it.
pub trait MapAdapter: Send + Sync + Sized + 'static {
    /// Scoped safe-access token of the backend's reclamation scheme.
    ///
    /// Dropping it ends the region. It may pin an epoch or announce the
    /// thread to a collector, so acquisition is not free.
    type Region<'a>
    where
        Self: 'a;

    /// Create an empty map.
    fn create() -> Self;

    /// Backend type and reclamation scheme of this adapter.
    fn descriptor() -> Descriptor;

    /// Enter a safe-access region. Never blocks indefinitely.
    fn enter_region(&self) -> Self::Region<'_>;

    /// Insert `key` (value = key) if absent. `true` only if newly inserted.
    fn try_insert(&self, key: u64, region: &Self::Region<'_>) -> bool;

    /// Remove `key` if present. `true` only if this call removed it.
    fn try_remove(&self, key: u64, region: &Self::Region<'_>) -> bool;

    /// Whether `key` is currently present.
    fn try_lookup(&self, key: u64, region: &Self::Region<'_>) -> bool;
}

/// Describes one (backend × reclamation scheme) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Backend type name, e.g. `papaya_hash_map`.
    #[serde(rename = "type")]
    pub backend: &'static str,

    /// Reclamation scheme the backend runs with.
    pub reclaimer: ReclaimerDescriptor,
}

impl Descriptor {
    /// Variant name used for lookup: `<backend>/<reclaimer label>`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}/{}", self.backend, self.reclaimer.label())
    }
}

/// Reclamation scheme and its tuning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReclaimerDescriptor {
    /// Scheme name, e.g. `seize`, `epoch`, `sdd`, `none`.
    #[serde(rename = "type")]
    pub scheme: &'static str,

    /// Retirement batch size, for schemes that batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

impl ReclaimerDescriptor {
    /// A scheme without parameters.
    #[must_use]
    pub const fn plain(scheme: &'static str) -> Self {
        Self {
            scheme,
            batch_size: None,
        }
    }

    /// Short label: the scheme name, suffixed with the batch size if set.
    #[must_use]
    pub fn label(&self) -> String {
        match self.batch_size {
            Some(batch) => format!("{}-{batch}", self.scheme),
            None => self.scheme.to_string(),
        }
    }
}
