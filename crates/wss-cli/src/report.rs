//! JSON run report for downstream result scripts.
//!
//! The integer on stdout stays the primary output; the report only echoes
//! the run's parameters next to the accumulator's counters so experiment
//! tables can pick them up without scraping stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use wss_core::{CacheMode, Summary, TraceFormat};
use wss_trace::io::LineStats;

/// Everything known about one run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Trace path as given (`-` for stdin).
    pub trace: String,
    /// Trace format.
    pub format: TraceFormat,
    /// Cache mode.
    pub cache_mode: CacheMode,
    /// `--duration` in hours, if any.
    pub duration_hours: Option<u64>,
    /// Lines read.
    pub lines: u64,
    /// Zero-length lines.
    pub empty_records: u64,
    /// Reading stopped at the duration limit.
    pub window_closed: bool,
    /// Accumulator counters.
    #[serde(flatten)]
    pub summary: Summary,
}

impl RunReport {
    /// Assemble a report from the run's inputs and outputs.
    pub fn new(
        trace: &Path,
        format: TraceFormat,
        cache_mode: CacheMode,
        duration_hours: Option<u64>,
        stats: LineStats,
        summary: Summary,
    ) -> Self {
        Self {
            trace: trace.display().to_string(),
            format,
            cache_mode,
            duration_hours,
            lines: stats.lines,
            empty_records: stats.empty,
            window_closed: stats.window_closed,
            summary,
        }
    }
}

/// Write `report` as pretty JSON, creating parent directories as needed.
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, report).context("serialize run report")?;
    w.write_all(b"\n").context("write newline")?;
    w.flush().context("flush report writer")?;
    Ok(())
}
