// crates/wss-trace/src/generator.rs

//! Tiny synthetic trace generator used by tests and benches.
//! Produces well-formed FIU or MSR lines with a fixed seed.

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

use rand::{rngs::StdRng, Rng as _, SeedableRng};
use std::fmt::Write as _;
use wss_core::TraceFormat;

/// One generated access, in the format's native units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticAccess {
    /// Timestamp in the format's ticks.
    pub timestamp: u64,
    /// Start address.
    pub start: u64,
    /// Length (may be zero).
    pub length: u64,
    /// Write vs. read.
    pub write: bool,
}

impl SyntheticAccess {
    /// Render as one trace line (no terminator).
    #[must_use]
    pub fn render(&self, format: TraceFormat) -> String {
        let op = if self.write { 'W' } else { 'R' };
        match format {
            TraceFormat::Fiu => format!(
                "{} 4242 synth {} {} {} 8 0 00000000000000000000000000000000",
                self.timestamp, self.start, self.length, op
            ),
            TraceFormat::Msr => format!(
                "{},synth,0,{},{},{},100",
                self.timestamp,
                if self.write { "Write" } else { "Read" },
                self.start,
                self.length
            ),
        }
    }
}

/// Generate `n` accesses:
/// - starts cluster in a small hot region (so units repeat) with occasional
///   far accesses,
/// - lengths are mostly whole pages/blocks with some unaligned tails,
/// - about 1% of requests are zero-length.
#[must_use]
pub fn generate_accesses(format: TraceFormat, n: usize, seed: u64) -> Vec<SyntheticAccess> {
    let mut rng = StdRng::seed_from_u64(seed);
    let span = format.geometry().span();
    let (mut ts, tick) = match format {
        // nanoseconds, ~1ms apart
        TraceFormat::Fiu => (89_000_000_000u64, 1_000_000u64),
        // filetime, ~1ms apart
        TraceFormat::Msr => (128_166_372_000_000_000u64, 10_000u64),
    };

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        ts += rng.random_range(1..=2 * tick);

        let region = if rng.random_bool(0.9) { 4096 } else { 1 << 20 };
        let mut start = rng.random_range(0..region) * span;
        if rng.random_bool(0.2) {
            start += rng.random_range(0..span);
        }

        let length = if rng.random_bool(0.01) {
            0
        } else if rng.random_bool(0.7) {
            rng.random_range(1..=32) * span
        } else {
            rng.random_range(1..=32 * span)
        };

        out.push(SyntheticAccess {
            timestamp: ts,
            start,
            length,
            write: rng.random_bool(0.3),
        });
    }
    out
}

/// Generate a complete trace text (newline-terminated lines).
#[must_use]
pub fn generate_trace_text(format: TraceFormat, n: usize, seed: u64) -> String {
    generate_accesses(format, n, seed)
        .iter()
        .fold(String::new(), |mut text, a| {
            let _ = writeln!(text, "{}", a.render(format));
            text
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reader::LineParser;

    #[test]
    fn deterministic() {
        assert_eq!(
            generate_trace_text(TraceFormat::Fiu, 50, 7),
            generate_trace_text(TraceFormat::Fiu, 50, 7)
        );
    }

    #[test]
    fn rendered_lines_parse_back() {
        for format in [TraceFormat::Fiu, TraceFormat::Msr] {
            let p = LineParser::new(format);
            for (i, a) in generate_accesses(format, 200, 1).iter().enumerate() {
                let got = p.parse(i as u64 + 1, &a.render(format), true).unwrap();
                assert_eq!(got.timestamp, Some(a.timestamp));
                match got.record {
                    Some(rec) => assert_eq!((rec.start, rec.length.get()), (a.start, a.length)),
                    None => assert_eq!(a.length, 0),
                }
            }
        }
    }
}
