//! Block I/O trace readers for working-set estimation.
//!
//! This crate provides the small pieces between a trace file and the
//! accumulator in `wss-core`:
//!
//! - `reader`: per-format line parser (`LineParser`) resolved once per run.
//! - `io`: opening a trace (file or stdin) and the streaming `TraceLines`
//!   iterator yielding one `AccessRecord` per line.
//! - `window`: optional `--duration` cut-off driven by line timestamps.
//! - `generator`: a deterministic synthetic trace generator for tests/benches.
//!
//! We intentionally avoid broad re-exports so callers use stable paths like
//! `wss_trace::io::TraceLines`.

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

/// Deterministic synthetic FIU/MSR lines.
pub mod generator;
/// Trace opening and the streaming record iterator.
pub mod io;
/// Per-format line parsing.
pub mod reader;
/// Time-bounded reading (`--duration`).
pub mod window;
