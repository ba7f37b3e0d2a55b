//! Trace formats, access records and addressing units.
//!
//! Addresses are kept in each format's *native* numeric domain: FIU lines
//! carry 512-byte sector numbers, MSR lines carry byte offsets. A unit is
//! identified by its first native address, so units from different records
//! compare and hash consistently.

use crate::error::WssError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Size in bytes of the smallest addressable increment in both formats.
pub const SUB_UNIT_BYTES: u64 = 512;

/// Bytes covered by one cache block in `dm-cache` mode.
pub const CACHE_BLOCK_BYTES: u64 = 64 * 1024;

/// Supported trace layouts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// FIU block traces: space-separated, LBA and size in 512-byte sectors,
    /// measured at 4096-byte page granularity.
    Fiu,
    /// MSR Cambridge traces: comma-separated, offset and size in bytes,
    /// measured at 512-byte block granularity.
    Msr,
}

impl TraceFormat {
    /// Name as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fiu => "fiu",
            Self::Msr => "msr",
        }
    }

    /// Field positions and delimiter for this format.
    #[must_use]
    pub const fn layout(self) -> FieldLayout {
        match self {
            // [ts ns] [pid] [process] [lba] [size] [R/W] [major] [minor] [md5]
            Self::Fiu => FieldLayout {
                delimiter: ' ',
                timestamp: 0,
                start: 3,
                length: 4,
            },
            // Timestamp,Hostname,DiskNumber,Type,Offset,Size,ResponseTime
            Self::Msr => FieldLayout {
                delimiter: ',',
                timestamp: 0,
                start: 4,
                length: 5,
            },
        }
    }

    /// Stride of one addressing unit in the native address domain.
    #[must_use]
    pub const fn geometry(self) -> UnitGeometry {
        match self {
            // 4096-byte page = 8 sectors.
            Self::Fiu => UnitGeometry::new(4096 / SUB_UNIT_BYTES),
            // 512-byte block, addresses are bytes.
            Self::Msr => UnitGeometry::new(SUB_UNIT_BYTES),
        }
    }

    /// Size of one quantization group in the native address domain.
    ///
    /// Both formats group into 64 KiB: 16 FIU pages (128 sectors), and
    /// 16 × 4096 byte-valued MSR addresses.
    ///
    /// The Python `set-size.py` helper this tool replaces grouped FIU by
    /// `addr % 16` on sector numbers, i.e. 8 KiB. FIU counts here are
    /// coarser than that script's for the same trace.
    #[must_use]
    pub const fn cache_block(self) -> u64 {
        match self {
            Self::Fiu => CACHE_BLOCK_BYTES / SUB_UNIT_BYTES,
            Self::Msr => CACHE_BLOCK_BYTES,
        }
    }

    /// Timestamp ticks per hour (FIU: nanoseconds, MSR: Windows filetime).
    #[must_use]
    pub const fn ticks_per_hour(self) -> u64 {
        match self {
            Self::Fiu => 1_000_000_000 * 60 * 60,
            Self::Msr => 10_000_000 * 60 * 60,
        }
    }
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraceFormat {
    type Err = WssError;

    /// Exact, case-sensitive match on `fiu` / `msr`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiu" => Ok(Self::Fiu),
            "msr" => Ok(Self::Msr),
            other => Err(WssError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Where a format keeps the fields the estimator reads (0-based indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field separator.
    pub delimiter: char,
    /// Timestamp field, only read when a time window is active.
    pub timestamp: usize,
    /// Start address field.
    pub start: usize,
    /// Access length field.
    pub length: usize,
}

impl FieldLayout {
    /// Number of fields a line needs for start and length to be present.
    #[must_use]
    pub const fn min_fields(&self) -> usize {
        let hi = if self.start > self.length {
            self.start
        } else {
            self.length
        };
        hi + 1
    }
}

/// Addressing-unit stride, in native addresses per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitGeometry {
    span: u64,
}

impl UnitGeometry {
    /// Create a geometry with `span` native addresses per unit.
    ///
    /// # Panics
    /// Panics if `span == 0`.
    #[must_use]
    pub const fn new(span: u64) -> Self {
        assert!(span > 0, "unit span must be > 0");
        Self { span }
    }

    /// Native addresses per unit.
    #[inline]
    #[must_use]
    pub const fn span(self) -> u64 {
        self.span
    }
}

/// Whether emitted units are coarsened to cache blocks.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Count units at the format's native granularity.
    #[default]
    Exact,
    /// Coarsen units to 64 KiB cache blocks, as dm-cache does.
    DmCache,
}

impl CacheMode {
    /// Only the literal `dm-cache` turns quantization on; anything else,
    /// including absence, leaves it off.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("dm-cache") => Self::DmCache,
            _ => Self::Exact,
        }
    }

    /// `true` in `dm-cache` mode.
    #[inline]
    #[must_use]
    pub const fn is_quantized(self) -> bool {
        matches!(self, Self::DmCache)
    }
}

/// One parsed trace line: where an access starts and how long it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessRecord {
    /// Start address in the format's native domain.
    pub start: u64,
    /// Length in the same domain; never zero.
    pub length: NonZeroU64,
}

impl AccessRecord {
    /// Create a record.
    #[inline]
    #[must_use]
    pub const fn new(start: u64, length: NonZeroU64) -> Self {
        Self { start, length }
    }
}

/// First native address of one addressing unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct AddressUnit(pub u64);

impl AddressUnit {
    /// Raw address.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AddressUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
