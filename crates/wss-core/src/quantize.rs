//! Cache-block quantization for `dm-cache` mode.
//!
//! dm-cache tracks data in fixed 64 KiB blocks, so two pages inside the same
//! block count once. Quantization rounds each emitted unit down to the start
//! of its group; it never changes which units an access expanded to.

use crate::types::{AddressUnit, TraceFormat};

/// Rounds units down to a fixed group boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantizer {
    group: u64,
}

impl Quantizer {
    /// Quantizer with an explicit group size in native addresses.
    ///
    /// # Panics
    /// Panics if `group == 0`.
    #[must_use]
    pub const fn new(group: u64) -> Self {
        assert!(group > 0, "quantization group must be > 0");
        Self { group }
    }

    /// The 64 KiB cache-block quantizer for `format`.
    #[must_use]
    pub const fn for_format(format: TraceFormat) -> Self {
        Self::new(format.cache_block())
    }

    /// Group size in native addresses.
    #[inline]
    #[must_use]
    pub const fn group(self) -> u64 {
        self.group
    }

    /// `unit - (unit mod group)`.
    #[inline]
    #[must_use]
    pub const fn apply(self, unit: AddressUnit) -> AddressUnit {
        AddressUnit(unit.0 - unit.0 % self.group)
    }
}
