//! Time-bounded reading.
//!
//! With a duration set, the first record's timestamp opens a window of that
//! many hours and the first record stamped after it ends the trace. Tick
//! rates differ per format (FIU: nanoseconds, MSR: 100 ns filetime).

use wss_core::{Result, TraceFormat, WssError};

/// Parse a duration such as `12h` or `2d` into whole hours.
///
/// # Errors
/// [`WssError::BadDuration`] for a missing/unknown suffix, a non-numeric or
/// zero count, or an hour count that overflows.
pub fn parse_duration_hours(s: &str) -> Result<u64> {
    let bad = || WssError::BadDuration(s.to_owned());
    let (count, per) = if let Some(n) = s.strip_suffix('h') {
        (n, 1u64)
    } else if let Some(n) = s.strip_suffix('d') {
        (n, 24u64)
    } else {
        return Err(bad());
    };
    let count: u64 = count.parse().map_err(|_| bad())?;
    if count == 0 {
        return Err(bad());
    }
    count.checked_mul(per).ok_or_else(bad)
}

/// Cut-off state for one run.
#[derive(Clone, Copy, Debug)]
pub struct TimeWindow {
    span: u64,
    end: Option<u64>,
}

impl TimeWindow {
    /// A window of `hours` for `format`'s timestamp ticks.
    #[must_use]
    pub const fn new(format: TraceFormat, hours: u64) -> Self {
        Self {
            span: format.ticks_per_hour().saturating_mul(hours),
            end: None,
        }
    }

    /// Whether a record stamped `ts` is inside the window. The first call
    /// anchors the window at `ts`.
    pub fn admit(&mut self, ts: u64) -> bool {
        let span = self.span;
        let end = *self.end.get_or_insert_with(|| ts.saturating_add(span));
        ts <= end
    }

    /// Last admitted timestamp, once anchored.
    #[must_use]
    pub const fn end(&self) -> Option<u64> {
        self.end
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(parse_duration_hours("12h").unwrap(), 12);
        assert_eq!(parse_duration_hours("2d").unwrap(), 48);
        for bad in ["", "h", "12", "0h", "3w", "-1h", "1.5h", "d2"] {
            assert!(
                matches!(parse_duration_hours(bad), Err(WssError::BadDuration(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn window_anchors_on_first_timestamp() {
        let hour = TraceFormat::Fiu.ticks_per_hour();
        let mut w = TimeWindow::new(TraceFormat::Fiu, 1);
        assert_eq!(w.end(), None);
        assert!(w.admit(1_000));
        assert_eq!(w.end(), Some(1_000 + hour));
        assert!(w.admit(1_000 + hour));
        assert!(!w.admit(1_001 + hour));
        // Earlier stamps are still inside.
        assert!(w.admit(0));
    }

    #[test]
    fn msr_ticks_are_coarser() {
        let mut w = TimeWindow::new(TraceFormat::Msr, 2);
        assert!(w.admit(0));
        assert!(w.admit(72_000_000_000));
        assert!(!w.admit(72_000_000_001));
    }
}
