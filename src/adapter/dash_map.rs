//! `dashmap::DashMap`: sharded `RwLock`s, nothing to reclaim lazily.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{Descriptor, MapAdapter, ReclaimerDescriptor};

/// Sharded lock-based hash map. Its region is empty.
pub struct ShardedDashMap {
    map: DashMap<u64, u64>,
}

impl MapAdapter for ShardedDashMap {
    type Region<'a> = ();

    fn create() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: "dash_map",
            reclaimer: ReclaimerDescriptor::plain("none"),
        }
    }

    #[inline]
    fn enter_region(&self) -> Self::Region<'_> {}

    #[inline]
    fn try_insert(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        match self.map.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(key);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    #[inline]
    fn try_remove(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.map.remove(&key).is_some()
    }

    #[inline]
    fn try_lookup(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.map.contains_key(&key)
    }
}
