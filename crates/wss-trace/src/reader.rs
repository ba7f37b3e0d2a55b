// crates/wss-trace/src/reader.rs

//! Per-format trace line parsing.
//!
//! The format is chosen once per run; the parser keeps the resolved
//! `FieldLayout` so the hot loop never compares format names.
//!
//! Field text is trimmed before integer parsing so trailing `\r` or padding
//! does not matter. Anything else that is not a base-10 unsigned integer
//! is a fatal error.

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

use std::num::NonZeroU64;
use wss_core::{AccessRecord, FieldLayout, Result, TraceFormat, WssError};

/// Fields pulled out of one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    /// The access, or `None` for a zero-length request.
    pub record: Option<AccessRecord>,
    /// Timestamp, when requested.
    pub timestamp: Option<u64>,
}

/// Parser for one trace format.
#[derive(Clone, Copy, Debug)]
pub struct LineParser {
    format: TraceFormat,
    layout: FieldLayout,
}

impl LineParser {
    /// Resolve the layout for `format`.
    #[must_use]
    pub const fn new(format: TraceFormat) -> Self {
        Self {
            format,
            layout: format.layout(),
        }
    }

    /// Format this parser reads.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> TraceFormat {
        self.format
    }

    /// Parse one line (without its terminator). `line_no` is 1-based and
    /// only used for error messages. The timestamp field is read only when
    /// `with_timestamp` is set.
    ///
    /// # Errors
    /// [`WssError::MissingField`] if the line is too short,
    /// [`WssError::BadInteger`] if a needed field is not an unsigned integer.
    pub fn parse(&self, line_no: u64, line: &str, with_timestamp: bool) -> Result<ParsedLine> {
        let l = &self.layout;
        let mut start = None;
        let mut length = None;
        let mut timestamp = None;
        let mut found = 0usize;

        for (i, field) in line.split(l.delimiter).enumerate() {
            found = i + 1;
            if i == l.start {
                start = Some(field);
            }
            if i == l.length {
                length = Some(field);
            }
            if with_timestamp && i == l.timestamp {
                timestamp = Some(field);
            }
        }

        let (Some(start), Some(length)) = (start, length) else {
            return Err(WssError::MissingField {
                line: line_no,
                needed: l.min_fields(),
                found,
                delimiter: l.delimiter,
            });
        };

        let start = parse_u64(line_no, l.start, "start address", start)?;
        let length = parse_u64(line_no, l.length, "length", length)?;
        let timestamp = match timestamp {
            Some(ts) => Some(parse_u64(line_no, l.timestamp, "timestamp", ts)?),
            None => None,
        };

        Ok(ParsedLine {
            record: NonZeroU64::new(length).map(|len| AccessRecord::new(start, len)),
            timestamp,
        })
    }
}

fn parse_u64(line: u64, index: usize, name: &'static str, field: &str) -> Result<u64> {
    let value = field.trim();
    value.parse::<u64>().map_err(|_| WssError::BadInteger {
        line,
        index,
        name,
        value: value.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FIU_LINE: &str = "89123456789 4123 postgres 4096 16 W 6 0 d41d8cd98f00b204e9800998ecf8427e";
    const MSR_LINE: &str = "128166372003061629,hm,1,Write,383496192,4096,1043";

    #[test]
    fn fiu_fields() {
        let p = LineParser::new(TraceFormat::Fiu);
        let got = p.parse(1, FIU_LINE, false).unwrap();
        assert_eq!(got.record.unwrap().start, 4096);
        assert_eq!(got.record.unwrap().length.get(), 16);
        assert_eq!(got.timestamp, None);

        let got = p.parse(1, FIU_LINE, true).unwrap();
        assert_eq!(got.timestamp, Some(89_123_456_789));
    }

    #[test]
    fn msr_fields() {
        let p = LineParser::new(TraceFormat::Msr);
        let got = p.parse(1, MSR_LINE, true).unwrap();
        let rec = got.record.unwrap();
        assert_eq!(rec.start, 383_496_192);
        assert_eq!(rec.length.get(), 4096);
        assert_eq!(got.timestamp, Some(128_166_372_003_061_629));
    }

    #[test]
    fn minimal_lines_are_enough() {
        let p = LineParser::new(TraceFormat::Fiu);
        let rec = p.parse(1, "0 0 p 0 512", false).unwrap().record.unwrap();
        assert_eq!((rec.start, rec.length.get()), (0, 512));

        let p = LineParser::new(TraceFormat::Msr);
        let rec = p.parse(1, "0,h,0,R,0,512", false).unwrap().record.unwrap();
        assert_eq!((rec.start, rec.length.get()), (0, 512));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let p = LineParser::new(TraceFormat::Msr);
        let rec = p.parse(1, "0,h,0,R, 512 ,1024\r", false).unwrap().record.unwrap();
        assert_eq!((rec.start, rec.length.get()), (512, 1024));
    }

    #[test]
    fn zero_length_has_no_record() {
        let p = LineParser::new(TraceFormat::Fiu);
        assert_eq!(p.parse(1, "0 0 p 80 0 R", false).unwrap().record, None);
    }

    #[test]
    fn too_few_fields() {
        let p = LineParser::new(TraceFormat::Fiu);
        let err = p.parse(7, "1 2 3 4", false).unwrap_err();
        assert!(matches!(
            err,
            WssError::MissingField { line: 7, needed: 5, found: 4, delimiter: ' ' }
        ));

        let p = LineParser::new(TraceFormat::Msr);
        assert!(matches!(
            p.parse(1, "", false).unwrap_err(),
            WssError::MissingField { found: 1, .. }
        ));
        // A space-delimited FIU line is one field to the MSR parser.
        assert!(matches!(
            p.parse(1, FIU_LINE, false).unwrap_err(),
            WssError::MissingField { found: 1, .. }
        ));
    }

    #[test]
    fn non_numeric_fields() {
        let p = LineParser::new(TraceFormat::Fiu);
        let err = p.parse(3, "0 0 p abc 8", false).unwrap_err();
        assert!(matches!(err, WssError::BadInteger { line: 3, index: 3, .. }));

        let err = p.parse(3, "0 0 p 8 -8", false).unwrap_err();
        assert!(matches!(err, WssError::BadInteger { index: 4, .. }));

        // Double spaces leave an empty field where a number should be.
        let err = p.parse(3, "0 0 p  8 8", false).unwrap_err();
        assert!(matches!(err, WssError::BadInteger { index: 3, .. }));
    }

    #[test]
    fn bad_timestamp_only_matters_when_read() {
        let p = LineParser::new(TraceFormat::Msr);
        let line = "later,h,0,R,0,512";
        assert!(p.parse(1, line, false).is_ok());
        assert!(matches!(
            p.parse(1, line, true).unwrap_err(),
            WssError::BadInteger { index: 0, name: "timestamp", .. }
        ));
    }
}
