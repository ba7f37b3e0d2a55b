//! wss-core — data model and arithmetic for working-set size estimation.
//!
//! This crate is I/O-free. It defines:
//! - the per-format constants (`TraceFormat`, `UnitGeometry`, `CacheMode`),
//! - the range expander turning one access into the aligned units it touches,
//! - the cache-block quantizer used in `dm-cache` mode, and
//! - the working-set accumulator whose cardinality is the reported result.
//!
//! ```
//! use std::num::NonZeroU64;
//! use wss_core::{AccessRecord, Accumulator, CacheMode, TraceFormat};
//!
//! let mut acc = Accumulator::new(TraceFormat::Fiu, CacheMode::Exact);
//! let rec = AccessRecord::new(0, NonZeroU64::new(512).unwrap());
//! acc.observe(&rec)?;
//! assert_eq!(acc.finish().working_set, 64);
//! # Ok::<(), wss_core::WssError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

/// Error taxonomy shared by the library crates.
pub mod error;
/// Range expansion: one access → the aligned units it covers.
pub mod expand;
/// Cache-block quantization (`dm-cache` mode).
pub mod quantize;
/// Trace formats, records, units and run modes.
pub mod types;
/// Working set and the per-run accumulator.
pub mod workingset;

pub use error::*;
pub use expand::*;
pub use quantize::*;
pub use types::*;
pub use workingset::*;

/// Commonly-used items for quick imports.
///
/// ```rust
/// use wss_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        error::WssError,
        types::*,
        workingset::{Accumulator, Summary, WorkingSet},
    };
}
