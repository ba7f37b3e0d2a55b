//! Opening traces and streaming them one record at a time.
//!
//! - **Opening**: `open_trace` returns a buffered reader over a file, or over
//!   standard input for the path `-`.
//! - **Reading**: `TraceLines` *owns* its reader and yields
//!   `Result<AccessRecord>` per line, so memory stays flat regardless of
//!   trace size. The first error ends iteration; there is no skip mode.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use crate::reader::LineParser;
use crate::window::TimeWindow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};
use wss_core::{AccessRecord, Result, TraceFormat, WssError};

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Open `path` for line reading (`-` reads stdin).
///
/// # Errors
/// [`WssError::Open`] if the file cannot be opened.
pub fn open_trace(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIN_PATH {
        debug!("reading trace from stdin");
        return Ok(Box::new(io::stdin().lock()));
    }
    let f = File::open(path).map_err(|source| WssError::Open {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), "opened trace");
    Ok(Box::new(BufReader::new(f)))
}

/// Counters kept while streaming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Lines read, including zero-length ones and the line that closed the
    /// time window.
    pub lines: u64,
    /// Well-formed lines with a zero length (no units).
    pub empty: u64,
    /// Whether reading stopped at the time window rather than end of input.
    pub window_closed: bool,
}

/// Owning iterator over the access records of a trace.
pub struct TraceLines<R> {
    rdr: R,
    parser: LineParser,
    window: Option<TimeWindow>,
    buf: String,
    stats: LineStats,
    done: bool,
}

impl<R: BufRead> TraceLines<R> {
    /// Stream `rdr` as a trace of `format`.
    pub fn new(rdr: R, format: TraceFormat) -> Self {
        Self {
            rdr,
            parser: LineParser::new(format),
            window: None,
            buf: String::with_capacity(256),
            stats: LineStats::default(),
            done: false,
        }
    }

    /// Stop after the first `hours` of trace time.
    #[must_use]
    pub fn with_duration(mut self, hours: u64) -> Self {
        self.window = Some(TimeWindow::new(self.parser.format(), hours));
        self
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> LineStats {
        self.stats
    }

    fn read_record(&mut self) -> Result<Option<AccessRecord>> {
        loop {
            self.buf.clear();
            if self.rdr.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.stats.lines += 1;
            let line_no = self.stats.lines;

            // Trim a single trailing '\n' or '\r\n'.
            if self.buf.ends_with('\n') {
                self.buf.pop();
                if self.buf.ends_with('\r') {
                    self.buf.pop();
                }
            }

            let parsed = self
                .parser
                .parse(line_no, &self.buf, self.window.is_some())?;

            // Zero-length lines are skipped before the window sees them: they
            // neither anchor it nor close it.
            let Some(rec) = parsed.record else {
                trace!(line = line_no, "zero-length access");
                self.stats.empty += 1;
                continue;
            };

            if let (Some(window), Some(ts)) = (self.window.as_mut(), parsed.timestamp) {
                if !window.admit(ts) {
                    debug!(line = line_no, ts, "end of duration reached");
                    self.stats.window_closed = true;
                    return Ok(None);
                }
            }

            return Ok(Some(rec));
        }
    }
}

impl<R: BufRead> Iterator for TraceLines<R> {
    type Item = Result<AccessRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for TraceLines<R> {}

/// Stream the trace at `path` (`-` for stdin).
///
/// # Errors
/// Opening the input may fail; individual items are `Err` for malformed
/// lines or read failures.
pub fn stream_trace(path: &Path, format: TraceFormat) -> Result<TraceLines<Box<dyn BufRead>>> {
    Ok(TraceLines::new(open_trace(path)?, format))
}
