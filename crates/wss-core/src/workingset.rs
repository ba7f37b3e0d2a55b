//! The working set and the accumulator that fills it for one run.
//!
//! The set only grows: there is no eviction and no window, so its final
//! cardinality is the distinct footprint of the whole trace. Memory is
//! bounded by the number of distinct units, which is the estimator's one
//! real scaling limit.

use crate::error::Result;
use crate::expand::expand;
use crate::quantize::Quantizer;
use crate::types::{AccessRecord, AddressUnit, CacheMode, TraceFormat, UnitGeometry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Set of distinct addressing units seen so far.
#[derive(Clone, Debug, Default)]
pub struct WorkingSet {
    units: HashSet<AddressUnit>,
}

impl WorkingSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unit. Returns `true` if it was not present before.
    #[inline]
    pub fn insert(&mut self, unit: AddressUnit) -> bool {
        self.units.insert(unit)
    }

    /// Whether `unit` has been seen.
    #[inline]
    #[must_use]
    pub fn contains(&self, unit: AddressUnit) -> bool {
        self.units.contains(&unit)
    }

    /// Number of distinct units.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// `true` if nothing has been inserted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Extend<AddressUnit> for WorkingSet {
    fn extend<I: IntoIterator<Item = AddressUnit>>(&mut self, iter: I) {
        self.units.extend(iter);
    }
}

/// Statistics of a finished run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    /// Records expanded.
    pub records: u64,
    /// Units emitted by expansion (after quantization, before dedup).
    pub units_emitted: u64,
    /// Distinct units: the reported working-set size.
    pub working_set: u64,
    /// Whether units were quantized to cache blocks.
    pub quantized: bool,
}

/// Expands records, optionally quantizes, and accumulates the working set.
#[derive(Debug)]
pub struct Accumulator {
    geometry: UnitGeometry,
    quantizer: Option<Quantizer>,
    set: WorkingSet,
    records: u64,
    units_emitted: u64,
}

impl Accumulator {
    /// Accumulator for `format`; `mode` decides whether units are quantized.
    #[must_use]
    pub fn new(format: TraceFormat, mode: CacheMode) -> Self {
        let quantizer = mode
            .is_quantized()
            .then(|| Quantizer::for_format(format));
        Self::with_parts(format.geometry(), quantizer)
    }

    /// Accumulator with an explicit geometry and quantizer.
    #[must_use]
    pub fn with_parts(geometry: UnitGeometry, quantizer: Option<Quantizer>) -> Self {
        Self {
            geometry,
            quantizer,
            set: WorkingSet::new(),
            records: 0,
            units_emitted: 0,
        }
    }

    /// Expand one record and insert every unit it covers.
    ///
    /// # Errors
    /// Propagates [`crate::WssError::AddressOverflow`] from expansion; the set
    /// is left untouched in that case.
    pub fn observe(&mut self, record: &AccessRecord) -> Result<()> {
        let units = expand(record, self.geometry)?;
        self.records += 1;
        self.units_emitted += units.remaining();
        match self.quantizer {
            Some(q) => self.set.extend(units.map(|u| q.apply(u))),
            None => self.set.extend(units),
        }
        Ok(())
    }

    /// Current working-set size.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// `true` before any unit has been inserted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Borrow the set.
    #[must_use]
    pub const fn working_set(&self) -> &WorkingSet {
        &self.set
    }

    /// Consume the accumulator and report the run.
    #[must_use]
    pub fn finish(self) -> Summary {
        let summary = Summary {
            records: self.records,
            units_emitted: self.units_emitted,
            working_set: self.set.len() as u64,
            quantized: self.quantizer.is_some(),
        };
        debug!(?summary, "working set complete");
        summary
    }
}
