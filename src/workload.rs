//! Operation bands: one random draw picks both the key and the operation.
//!
//! The `u64` space is split into three contiguous intervals:
//!
//! ```text
//! 0            insert_upper       remove_upper               u64::MAX
//! |---- insert ----|---- remove ----|---------- lookup ----------|
//! ```
//!
//! The key is `r % key_range` and the operation is the band `r` falls in, so
//! classification is O(1) with no extra draws. Long-run frequencies follow the
//! ratios; a single fixed-size batch need not match them exactly.

use crate::error::{HarnessError, HarnessResult};

/// The operation a draw maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Insert-if-absent.
    Insert,
    /// Remove-if-present.
    Remove,
    /// Presence check.
    Lookup,
}

/// Thresholds partitioning the `u64` range into insert/remove/lookup bands.
///
/// Invariant: `insert_upper <= remove_upper <= u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationBands {
    insert_upper: u64,
    remove_upper: u64,
}

impl OperationBands {
    /// Derive bands from the insert and remove ratios.
    ///
    /// `remove_upper` is computed from the combined `insert_ratio + remove_ratio`,
    /// so the remove band starts where the insert band ends.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Configuration`] if either ratio is outside `[0.0, 1.0]`
    /// (NaN included) or their sum exceeds `1.0`.
    pub fn new(insert_ratio: f64, remove_ratio: f64) -> HarnessResult<Self> {
        check_ratio("insert_ratio", insert_ratio)?;
        check_ratio("remove_ratio", remove_ratio)?;

        let update_ratio: f64 = insert_ratio + remove_ratio;
        if update_ratio > 1.0 {
            return Err(HarnessError::configuration(
                "insert_ratio + remove_ratio",
                update_ratio,
                "the sum of remove_ratio and insert_ratio must be <= 1.0",
            ));
        }

        Ok(Self {
            insert_upper: scale(insert_ratio),
            remove_upper: scale(update_ratio),
        })
    }

    /// Upper (exclusive) bound of the insert band.
    #[must_use]
    #[inline]
    pub const fn insert_upper(&self) -> u64 {
        self.insert_upper
    }

    /// Upper (exclusive) bound of the remove band.
    #[must_use]
    #[inline]
    pub const fn remove_upper(&self) -> u64 {
        self.remove_upper
    }

    /// Classify a random draw.
    #[must_use]
    #[inline(always)]
    pub const fn classify(&self, r: u64) -> Operation {
        if r < self.insert_upper {
            Operation::Insert
        } else if r < self.remove_upper {
            Operation::Remove
        } else {
            Operation::Lookup
        }
    }

    /// Widths of the insert, remove and lookup bands. They always sum to `u64::MAX`.
    #[must_use]
    pub const fn widths(&self) -> (u64, u64, u64) {
        (
            self.insert_upper,
            self.remove_upper - self.insert_upper,
            u64::MAX - self.remove_upper,
        )
    }
}

/// Select the key for a draw.
///
/// `key_range` must be non-zero; config validation guarantees that.
#[must_use]
#[inline(always)]
pub const fn select_key(r: u64, key_range: u64) -> u64 {
    r % key_range
}

fn check_ratio(param: &'static str, ratio: f64) -> HarnessResult<()> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(HarnessError::configuration(
            param,
            ratio,
            "must be >= 0.0 and <= 1.0",
        ))
    }
}

/// Scale a ratio in `[0, 1]` onto the `u64` range.
///
/// `u64::MAX as f64` rounds up to 2^64; the float-to-int cast saturates, so a
/// ratio of 1.0 yields `u64::MAX`.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "ratio is validated to [0, 1] and the cast saturates"
)]
fn scale(ratio: f64) -> u64 {
    (ratio * u64::MAX as f64) as u64
}
