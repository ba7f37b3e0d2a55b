//! Errors raised while reading and expanding a trace.
//!
//! Every variant is fatal for the run: the estimator never skips a line it
//! cannot understand, since a skipped line silently shrinks the result.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the core and trace crates.
#[derive(Error, Debug)]
pub enum WssError {
    /// The format name is not one of the supported trace formats.
    #[error("unsupported trace format `{0}` (expected `fiu` or `msr`)")]
    UnknownFormat(String),

    /// A line has fewer delimiter-separated fields than the layout requires.
    #[error("line {line}: expected at least {needed} {delimiter:?}-separated fields, found {found}")]
    MissingField {
        /// 1-based line number.
        line: u64,
        /// Minimum number of fields the layout reads.
        needed: usize,
        /// Number of fields actually present.
        found: usize,
        /// Field delimiter of the format.
        delimiter: char,
    },

    /// A field that must hold an unsigned integer does not.
    #[error("line {line}: field {index} ({name}) is not an unsigned integer: {value:?}")]
    BadInteger {
        /// 1-based line number.
        line: u64,
        /// 0-based field index.
        index: usize,
        /// What the field holds.
        name: &'static str,
        /// Raw (trimmed) field text.
        value: String,
    },

    /// The access reaches past the end of the 64-bit address domain.
    #[error("access at {start} with length {length} overflows the address space")]
    AddressOverflow {
        /// Start address of the access.
        start: u64,
        /// Length of the access.
        length: u64,
    },

    /// A duration string is not `<N>h` / `<N>d` with `N > 0`.
    #[error("invalid duration {0:?} (expected e.g. `12h` or `2d`)")]
    BadDuration(String),

    /// The trace could not be opened.
    #[error("cannot open trace {}: {source}", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already-open trace failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, WssError>;
