//! `crossbeam_skiplist::base::SkipList` under crossbeam-epoch.
//!
//! The base API takes the pinned [`Guard`] explicitly, so the region token is
//! the epoch pin itself and one pin covers a whole batch.
//!
//! `get_or_insert_with` does not say whether the returned entry is the one
//! this call linked: a racing insert of the same key can win the link CAS
//! after our value was built. Every insert therefore stores a token unique to
//! the attempt, and only the caller whose token ends up in the list counts
//! the insert.

use std::cell::Cell;
use std::sync::atomic::AtomicU64;

use crossbeam_epoch::{self as epoch, Guard};
use crossbeam_skiplist::base::SkipList;

use super::{Descriptor, MapAdapter, ReclaimerDescriptor};
use crate::ordering::TOKEN_ISSUE;

/// Next per-thread token prefix.
static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static NEXT_TOKEN: Cell<InsertToken> = Cell::new(InsertToken {
        thread: NEXT_THREAD_TAG.fetch_add(1, TOKEN_ISSUE),
        seq: 0,
    });
}

/// Value stored under each key. Never read by lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InsertToken {
    thread: u64,
    seq: u64,
}

fn next_token() -> InsertToken {
    NEXT_TOKEN.with(|cell| {
        let token = cell.get();
        cell.set(InsertToken {
            seq: token.seq.wrapping_add(1),
            ..token
        });
        token
    })
}

/// Lock-free skip list with epoch-based reclamation.
pub struct EpochSkipList {
    list: SkipList<u64, InsertToken>,
}

impl MapAdapter for EpochSkipList {
    type Region<'a> = Guard;

    fn create() -> Self {
        Self {
            list: SkipList::new(epoch::default_collector().clone()),
        }
    }

    fn descriptor() -> Descriptor {
        Descriptor {
            backend: "skip_list",
            reclaimer: ReclaimerDescriptor::plain("epoch"),
        }
    }

    #[inline]
    fn enter_region(&self) -> Self::Region<'_> {
        epoch::pin()
    }

    #[inline]
    fn try_insert(&self, key: u64, region: &Self::Region<'_>) -> bool {
        let token = next_token();
        let entry = self.list.get_or_insert_with(key, || token, region);
        let inserted = *entry.value() == token;
        entry.release(region);
        inserted
    }

    #[inline]
    fn try_remove(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.list.remove(&key, region).is_some_and(|entry| {
            entry.release(region);
            true
        })
    }

    #[inline]
    fn try_lookup(&self, key: u64, region: &Self::Region<'_>) -> bool {
        self.list.get(&key, region).is_some()
    }
}
