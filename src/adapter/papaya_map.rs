//! `papaya::HashMap` under seize (hyaline) reclamation.

use papaya::{HashMap, LocalGuard};
use seize::Collector;

use super::{Descriptor, MapAdapter, ReclaimerDescriptor};

/// Lock-free hash map with seize reclamation.
///
/// `BATCH` is the collector's retirement batch size; `0` keeps papaya's
/// default collector.
pub struct PapayaHashMap<const BATCH: usize = 0> {
    map: HashMap<u64, u64>,
}

impl<const BATCH: usize> MapAdapter for PapayaHashMap<BATCH> {
    type Region<'a> = LocalGuard<'a>;

    fn create() -> Self {
        let map = if BATCH == 0 {
            HashMap::new()
        } else {
            HashMap::builder()
                .collector(Collector::new().batch_size(BATCH))
                .build()
        };
        Self { map }
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: "papaya_hash_map",
            reclaimer: ReclaimerDescriptor {
                scheme: "seize",
                batch_size: (BATCH > 0).then_some(BATCH),
            },
        }
    }

    #[inline]
    fn enter_region(&self) -> Self::Region<'_> {
        self.map.guard()
    }

    #[inline]
    fn try_insert(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.map.try_insert(key, key, region).is_ok()
    }

    #[inline]
    fn try_remove(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.map.remove(&key, region).is_some()
    }

    #[inline]
    fn try_lookup(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.map.contains_key(&key, region)
    }
}
