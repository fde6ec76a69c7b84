//! The headless runner end to end: argv to placement lines.

use bevelbar::Cli;
use bevelbar::headless;
use bevelbar_core::error::BarError;
use bevelbar_core::protocol::ParseError;
use clap::Parser;

// builtin:size=10 is a 5px cell, ascent 8, descent 2: height 12, margin 3,
// bar height 16. A two-cell segment advances 10 + 6 + 2 = 18.
fn config(extra: &[&str]) -> bevelbar::Config {
    let args = [
        "bevelbar", "right", "bottom", "5", "7", "builtin:size=10", "gray20", "gray60", "black",
        "navy", "yellow", "blue", "midnightblue", "--headless",
    ];
    Cli::try_parse_from(args.iter().chain(extra))
        .unwrap()
        .into_config()
        .unwrap()
}

fn run(config: bevelbar::Config, input: &[u8]) -> (BarError, String) {
    let mut out = Vec::new();
    let err = headless::run(config, input, &mut out).unwrap_err();
    (err, String::from_utf8(out).unwrap())
}

#[test]
fn each_frame_prints_one_line_per_monitor() {
    let (err, out) = run(config(&[]), b"0\n0ab\ne\nf\n0\n-\ne\nf\n");
    assert!(matches!(err, BarError::InputStreamFailure(_)));
    // 1 + 18 + 1 = 20 wide; then 1 + 6 + 1 = 8 wide for the empty segment.
    assert_eq!(out, "monitor 0 20x16+1895+1057\nmonitor 0 8x16+1907+1057\n");
}

#[test]
fn monitors_are_ordered_and_addressed_by_index() {
    let extra = [
        "--output", "800x600+1920+0", "--output", "1920x1080+0+0",
    ];
    let (_, out) = run(config(&extra), b"1\n-\ne\nf\n");
    // Monitor 0 is the left output and stays a bare border.
    assert_eq!(
        out,
        "monitor 0 2x16+1913+1057\nmonitor 1 8x16+2707+577\n"
    );
}

#[test]
fn malformed_frame_stops_without_output() {
    let (err, out) = run(config(&[]), b"0\n0ok\ne\nf\n0\n9bad\ne\nf\n");
    assert!(matches!(
        err,
        BarError::MalformedInput(ParseError::InvalidStyleIndex { .. })
    ));
    assert_eq!(out, "monitor 0 20x16+1895+1057\n");
}

#[test]
fn no_usable_outputs_fails_before_reading() {
    let (err, out) = run(config(&["--output", "0x0+0+0"]), b"");
    assert!(matches!(err, BarError::NoDisplaysFound));
    assert!(out.is_empty());
}
