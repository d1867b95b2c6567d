//! Baseline: a `std` hash map behind one `parking_lot::RwLock`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;

use super::{Descriptor, MapAdapter, ReclaimerDescriptor};

/// Single-lock hash map. Shows what the lock-free backends are buying.
pub struct LockedHashMap {
    map: RwLock<HashMap<u64, u64>>,
}

impl MapAdapter for LockedHashMap {
    type Region<'a> = ();

    fn create() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: "locked_hash_map",
            reclaimer: ReclaimerDescriptor::plain("none"),
        }
    }

    #[inline]
    fn enter_region(&self) -> Self::Region<'_> {}

    #[inline]
    fn try_insert(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        match self.map.write().entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(key);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    #[inline]
    fn try_remove(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.map.write().remove(&key).is_some()
    }

    #[inline]
    fn try_lookup(&self, key: u64, _region: &Self::Region<'_>) -> bool {
        self.map.read().contains_key(&key)
    }
}
