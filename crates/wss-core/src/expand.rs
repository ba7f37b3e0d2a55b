//! Expand an access into the aligned addressing units it touches.
//!
//! For a record `(start, length)` and a unit span `s`:
//!
//! - `rem = start mod s`, `aligned = start - rem` (round the start down),
//! - `ext = length + rem` (the length grows by what the rounding skipped),
//! - `count = ceil(ext / s)`,
//! - units are `aligned, aligned + s, …` (`count` of them).
//!
//! The result is a lazy iterator consumed once per record; nothing is
//! buffered across records.

use crate::error::{Result, WssError};
use crate::types::{AccessRecord, AddressUnit, UnitGeometry};
use std::iter::FusedIterator;

/// Iterator over the units covered by one access.
#[derive(Clone, Debug)]
pub struct UnitRange {
    next: u64,
    remaining: u64,
    stride: u64,
}

impl UnitRange {
    /// Number of units still to be yielded.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for UnitRange {
    type Item = AddressUnit;

    #[inline]
    fn next(&mut self) -> Option<AddressUnit> {
        if self.remaining == 0 {
            return None;
        }
        let unit = self.next;
        self.remaining -= 1;
        // The last unit was checked to fit at construction; only step while
        // more remain so the final step never leaves the domain.
        if self.remaining > 0 {
            self.next += self.stride;
        }
        Some(AddressUnit(unit))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for UnitRange {}

/// Number of units an access of `length` starting at `start` touches.
///
/// Rounds `length + (start mod s)` up to a whole number of units. Returns
/// `None` when the extended length does not fit in `u64`.
#[inline]
#[must_use]
pub const fn unit_count(start: u64, length: u64, geometry: UnitGeometry) -> Option<u64> {
    let s = geometry.span();
    let rem = start % s;
    let ext = match length.checked_add(rem) {
        Some(v) => v,
        None => return None,
    };
    // Same value as adding `s` before the floor division when a partial
    // unit is left over, without the intermediate overflow.
    let partial = if ext % s > 0 { 1 } else { 0 };
    Some(ext / s + partial)
}

/// Expand `record` into its covering units.
///
/// # Errors
/// [`WssError::AddressOverflow`] if the extended length or the last unit's
/// address does not fit in `u64`.
pub fn expand(record: &AccessRecord, geometry: UnitGeometry) -> Result<UnitRange> {
    let s = geometry.span();
    let start = record.start;
    let length = record.length.get();
    let overflow = || WssError::AddressOverflow { start, length };

    let aligned = start - start % s;
    let count = unit_count(start, length, geometry).ok_or_else(overflow)?;

    // `count >= 1` because `length > 0`.
    (count - 1)
        .checked_mul(s)
        .and_then(|span| aligned.checked_add(span))
        .ok_or_else(overflow)?;

    Ok(UnitRange {
        next: aligned,
        remaining: count,
        stride: s,
    })
}
