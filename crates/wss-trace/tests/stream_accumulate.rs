//! End-to-end: stream a trace through the accumulator and compare with a
//! model that marks every native address an access covers.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::io::Cursor;
use wss_core::{Accumulator, CacheMode, TraceFormat, WssError};
use wss_trace::generator::{generate_accesses, generate_trace_text};
use wss_trace::io::TraceLines;
use wss_trace::reader::LineParser;

fn run(text: &str, format: TraceFormat, mode: CacheMode) -> Result<u64, WssError> {
    let mut acc = Accumulator::new(format, mode);
    for rec in TraceLines::new(Cursor::new(text), format) {
        acc.observe(&rec?)?;
    }
    Ok(acc.finish().working_set)
}

fn model(format: TraceFormat, n: usize, seed: u64, mode: CacheMode) -> u64 {
    let span = format.geometry().span();
    let group = format.cache_block();
    let mut units = BTreeSet::new();
    for a in generate_accesses(format, n, seed) {
        let mut addr = a.start;
        while addr < a.start + a.length {
            let unit = addr - addr % span;
            units.insert(match mode {
                CacheMode::Exact => unit,
                CacheMode::DmCache => unit - unit % group,
            });
            addr = unit + span;
        }
    }
    units.len() as u64
}

#[test]
fn fiu_scenario_one_line() {
    let got = run("0 1 p 0 512 R 8 0 x\n", TraceFormat::Fiu, CacheMode::Exact).unwrap();
    assert_eq!(got, 64);
}

#[test]
fn msr_scenario_one_line() {
    let got = run("0,h,0,Read,0,512,1\n", TraceFormat::Msr, CacheMode::Exact).unwrap();
    assert_eq!(got, 1);
}

#[test]
fn fiu_scenario_quantized_pair() {
    let text = "0 1 p 0 128 R\n1 1 p 128 128 R\n";
    assert_eq!(run(text, TraceFormat::Fiu, CacheMode::Exact).unwrap(), 32);
    assert_eq!(run(text, TraceFormat::Fiu, CacheMode::DmCache).unwrap(), 2);
}

#[test]
fn short_line_aborts_the_run() {
    let text = "0 1 p 0 8 R\n0 1 p 8\n";
    let err = run(text, TraceFormat::Fiu, CacheMode::Exact).unwrap_err();
    assert!(matches!(err, WssError::MissingField { line: 2, .. }));
}

#[test]
fn generated_traces_match_model() {
    for format in [TraceFormat::Fiu, TraceFormat::Msr] {
        for mode in [CacheMode::Exact, CacheMode::DmCache] {
            let text = generate_trace_text(format, 2000, 11);
            let got = run(&text, format, mode).unwrap();
            assert_eq!(got, model(format, 2000, 11, mode), "{format} {mode:?}");
        }
    }
}

#[test]
fn quantized_is_never_larger() {
    for seed in 0..8 {
        for format in [TraceFormat::Fiu, TraceFormat::Msr] {
            let text = generate_trace_text(format, 500, seed);
            let exact = run(&text, format, CacheMode::Exact).unwrap();
            let quantized = run(&text, format, CacheMode::DmCache).unwrap();
            assert!(quantized <= exact);
            assert!(quantized > 0);
        }
    }
}

proptest! {
    // Property: arbitrary input never panics the parser; it either parses or
    // reports a typed error.
    #[test]
    fn parser_is_total(line in ".{0,80}") {
        for format in [TraceFormat::Fiu, TraceFormat::Msr] {
            let p = LineParser::new(format);
            match p.parse(1, &line, true) {
                Ok(_)
                | Err(WssError::MissingField { .. })
                | Err(WssError::BadInteger { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
