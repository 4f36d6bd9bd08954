//! End-to-end probe scenarios against a scripted pseudo-terminal.

use std::time::{Duration, Instant};

use crate::helpers::run_in_pty;

#[test]
fn applies_the_reported_size_by_default() {
    let run = run_in_pty(&[], Some(b"\x1b[51;211R"));

    assert!(run.status.success(), "output: {}", run.output);
    assert!(
        run.output.contains("terminal size: rows=51, cols=211"),
        "output: {}",
        run.output
    );
    assert_eq!((run.final_size.rows, run.final_size.cols), (51, 211));
}

#[test]
fn print_mode_reports_without_applying() {
    let run = run_in_pty(&["--print"], Some(b"\x1b[37;83R"));

    assert!(run.status.success(), "output: {}", run.output);
    assert!(
        run.output.contains("terminal size: rows=37, cols=83"),
        "output: {}",
        run.output
    );
    // The pty keeps the size it was opened with
    assert_eq!((run.final_size.rows, run.final_size.cols), (24, 80));
}

#[test]
fn quiet_mode_applies_without_reporting() {
    let run = run_in_pty(&["-q"], Some(b"\x1b[51;211R"));

    assert!(run.status.success(), "output: {}", run.output);
    assert!(
        !run.output.contains("terminal size"),
        "output: {}",
        run.output
    );
    assert_eq!((run.final_size.rows, run.final_size.cols), (51, 211));
}

#[test]
fn quiet_print_mode_still_reports() {
    let run = run_in_pty(&["-q", "-p"], Some(b"\x1b[51;211R"));

    assert!(run.status.success(), "output: {}", run.output);
    assert!(
        run.output.contains("terminal size: rows=51, cols=211"),
        "output: {}",
        run.output
    );
    assert_eq!((run.final_size.rows, run.final_size.cols), (24, 80));
}

#[test]
fn silent_terminal_times_out_with_a_nonzero_exit() {
    let started = Instant::now();
    let run = run_in_pty(&["-t", "100ms"], None);
    let elapsed = started.elapsed();

    assert!(!run.status.success(), "output: {}", run.output);
    assert!(elapsed >= Duration::from_millis(100), "exited after {elapsed:?}");
    assert!(
        run.output.contains("no cursor position report"),
        "output: {}",
        run.output
    );
    assert_eq!((run.final_size.rows, run.final_size.cols), (24, 80));
}
