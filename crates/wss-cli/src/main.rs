// crates/wss-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wss_core::{Accumulator, CacheMode, Summary, TraceFormat, WssError};
use wss_trace::io::{stream_trace, LineStats};
use wss_trace::window::parse_duration_hours;

use crate::report::{write_report, RunReport};

#[derive(Parser, Debug)]
#[command(
    name = "wss",
    about = "Working-set size of a block I/O trace",
    long_about = "Working-set size of a block I/O trace.\n\nCounts the distinct pages (FIU) or blocks (MSR) touched by every access in the trace and prints that number. With `dm-cache` as the cache mode, units are first coarsened to 64 KiB cache blocks.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Trace file to read (`-` for standard input)
    trace: PathBuf,

    /// Trace format: `fiu` or `msr`
    #[arg(value_parser = parse_format)]
    format: TraceFormat,

    /// Cache mode; only `dm-cache` changes anything (64 KiB cache blocks)
    #[arg(allow_hyphen_values = true)]
    cache_mode: Option<String>,

    /// Further positional arguments are accepted and ignored
    #[arg(hide = true, num_args = 0.., allow_hyphen_values = true)]
    ignored: Vec<String>,

    /// Only measure the first part of the trace, e.g. `12h` or `2d`
    #[arg(long, value_parser = parse_duration)]
    duration: Option<u64>,

    /// Also write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<TraceFormat, WssError> {
    s.parse()
}

fn parse_duration(s: &str) -> Result<u64, WssError> {
    parse_duration_hours(s)
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mode = CacheMode::from_arg(cli.cache_mode.as_deref());
    let (stats, summary) = measure(&cli, mode)?;

    if let Some(path) = &cli.report {
        let report = RunReport::new(&cli.trace, cli.format, mode, cli.duration, stats, summary);
        write_report(path, &report)
            .with_context(|| format!("writing run report to {}", path.display()))?;
    }

    println!("{}", summary.working_set);
    Ok(())
}

/// Initialize tracing with an env-driven filter (default WARN).
///
/// Logs go to stderr: stdout carries only the result.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Stream the trace once and accumulate its working set.
fn measure(cli: &Cli, mode: CacheMode) -> Result<(LineStats, Summary)> {
    if let (Some(arg), CacheMode::Exact) = (cli.cache_mode.as_deref(), mode) {
        debug!(cache_mode = arg, "cache mode is not `dm-cache`; counting exact units");
    }
    if !cli.ignored.is_empty() {
        debug!(ignored = ?cli.ignored, "ignoring extra arguments");
    }
    info!(
        trace = %cli.trace.display(),
        format = %cli.format,
        ?mode,
        duration_hours = ?cli.duration,
        "measuring working set"
    );

    let mut lines = stream_trace(&cli.trace, cli.format)
        .with_context(|| format!("opening trace {}", cli.trace.display()))?;
    if let Some(hours) = cli.duration {
        lines = lines.with_duration(hours);
    }

    let mut acc = Accumulator::new(cli.format, mode);
    for rec in lines.by_ref() {
        let rec = rec.with_context(|| format!("reading trace {}", cli.trace.display()))?;
        acc.observe(&rec)
            .with_context(|| format!("expanding access in {}", cli.trace.display()))?;
    }

    let stats = lines.stats();
    let summary = acc.finish();
    info!(
        lines = stats.lines,
        empty = stats.empty,
        window_closed = stats.window_closed,
        units = summary.units_emitted,
        working_set = summary.working_set,
        "trace done"
    );
    Ok((stats, summary))
}
