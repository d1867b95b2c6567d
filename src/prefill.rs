//! Map prefill on an isolated thread.
//!
//! Reclamation schemes that keep a global list of participating threads
//! (quiescent-state based ones in particular) would stall if the setup thread
//! registered and then never announced quiescence. Prefill therefore runs on
//! a dedicated scoped thread, inside a single region, and is joined before
//! this function returns. The calling thread never touches the map.

use std::thread;

use crate::adapter::MapAdapter;
use crate::error::{HarnessError, HarnessResult};

/// Insert `count` keys evenly spaced over `[0, key_range)`, starting at 0.
///
/// The step is `key_range / count` (integer division). `count == 0` is a no-op.
/// Returns the number of keys inserted, which equals `count` on success.
///
/// # Errors
///
/// - [`HarnessError::Configuration`] if `count > key_range` (the step would be 0).
/// - [`HarnessError::Initialization`] if any insert is rejected (the map was
///   not empty) or the prefill thread could not run to completion.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(map)))]
pub fn prefill<M: MapAdapter>(map: &M, key_range: u64, count: u64) -> HarnessResult<u64> {
    if count == 0 {
        return Ok(0);
    }

    let step: u64 = key_range / count;
    if step == 0 {
        return Err(HarnessError::configuration(
            "prefill",
            count,
            "must not exceed key_range",
        ));
    }

    let outcome = thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("prefill".to_string())
            .spawn_scoped(scope, move || fill(map, step, count))
            .map_err(|_| HarnessError::Initialization {
                key: None,
                inserted: 0,
            })?;

        handle.join().map_err(|_| HarnessError::Initialization {
            key: None,
            inserted: 0,
        })?
    });

    #[cfg(feature = "tracing")]
    match &outcome {
        Ok(inserted) => tracing::debug!(inserted, step, "prefill complete"),
        Err(err) => tracing::error!(%err, "prefill failed"),
    }

    outcome
}

/// Body of the prefill thread: one region around the whole loop.
fn fill<M: MapAdapter>(map: &M, step: u64, count: u64) -> HarnessResult<u64> {
    let region = map.enter_region();

    let mut key: u64 = 0;
    for inserted in 0..count {
        if !map.try_insert(key, &region) {
            return Err(HarnessError::Initialization {
                key: Some(key),
                inserted,
            });
        }
        key += step;
    }

    Ok(count)
}
