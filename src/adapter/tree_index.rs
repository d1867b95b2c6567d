//! `scc::TreeIndex` under sdd epoch-based reclamation.

use scc::TreeIndex;
use sdd::Guard;

use super::{Descriptor, MapAdapter, ReclaimerDescriptor};

/// Read-optimized concurrent B+tree. Lookups borrow through the region guard;
/// writers pin internally, which nests inside the outer region.
pub struct SddTreeIndex {
    index: TreeIndex<u64, u64>,
}

impl MapAdapter for SddTreeIndex {
    type Region<'a> = Guard;

    fn create() -> Self {
        Self {
            index: TreeIndex::new(),
        }
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: "tree_index",
            reclaimer: ReclaimerDescriptor::plain("sdd"),
        }
    }

    #[inline]
    fn enter_region(&self) -> Self::Region<'_> {
        Guard::new()
    }

    #[inline]
    fn try_insert(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.index.insert_sync(key, key).is_ok()
    }

    #[inline]
    fn try_remove(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.index.remove_sync(&key)
    }

    #[inline]
    fn try_lookup(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.index.peek(&key, region).is_some()
    }
}
