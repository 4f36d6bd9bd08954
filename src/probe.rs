//! Cursor-position size probe.
//!
//! Asks the terminal itself how big it is: park the cursor at the
//! bottom-right with `CUP 9999;9999`, request a cursor position report with
//! `DSR 6`, and read back `ESC [ rows ; cols R`. The terminal clamps the
//! cursor move to its real last cell, so the report carries the true
//! dimensions even when the kernel's winsize record is stale or absent
//! (serial consoles, some pass-through sessions).

use std::io::{ErrorKind, Read};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::terminal::{TermSize, Terminal, TerminalError};

/// Move the cursor far past any plausible bottom-right corner, then ask
/// where it actually ended up. Written as one combined sequence.
const CURSOR_REPORT_QUERY: &[u8] = b"\x1b[9999;9999H\x1b[6n";

/// Final byte of a cursor position report.
const REPORT_TERMINATOR: u8 = b'R';

/// How a probe run is carried out.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Push the discovered size into the kernel's winsize record.
    pub apply: bool,
    /// How long to wait for the terminal's report.
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            apply: true,
            timeout: Duration::from_secs(2),
        }
    }
}

/// Probe failures, in the order the protocol can hit them.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to open terminal reader: {0}")]
    Acquire(#[source] TerminalError),

    #[error("failed to enter raw mode: {0}")]
    RawMode(#[source] TerminalError),

    #[error("failed to send cursor position query: {0}")]
    Write(#[source] TerminalError),

    #[error("no cursor position report within {0:?}")]
    Timeout(Duration),

    #[error("failed to apply window size: {0}")]
    Apply(#[source] TerminalError),
}

/// Run one probe: raw mode, query, timed read, restore, parse, optional
/// apply.
///
/// The terminal is restored on every path out of here once raw mode has
/// been entered, before the report is parsed or applied. A restore failure
/// during that cleanup is logged rather than allowed to mask the error
/// that ended the probe.
pub fn probe(term: &mut Terminal, opts: &ProbeOptions) -> Result<TermSize, ProbeError> {
    let reader = term.reader().map_err(ProbeError::Acquire)?;
    term.enter_raw_mode().map_err(ProbeError::RawMode)?;

    // Listener before query, so the report cannot arrive unheard.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || read_report(reader, tx));

    debug!("sending cursor position query");
    if let Err(err) = term.write_all(CURSOR_REPORT_QUERY) {
        restore_best_effort(term);
        return Err(ProbeError::Write(err));
    }

    let report = await_report(&rx, opts.timeout);
    restore_best_effort(term);
    let report = report.ok_or(ProbeError::Timeout(opts.timeout))?;

    let size = parse_cursor_report(&report);
    debug!(rows = size.rows, cols = size.cols, "parsed cursor position report");

    if opts.apply {
        term.set_window_size(size).map_err(ProbeError::Apply)?;
    }
    Ok(size)
}

fn restore_best_effort(term: &mut Terminal) {
    if let Err(err) = term.restore() {
        warn!("failed to restore terminal attributes: {err}");
    }
}

/// Reader half of the probe: collect bytes until the report terminator and
/// hand the whole report over. Read errors and EOF end the thread without
/// delivering anything; the orchestrator's deadline covers that case.
fn read_report<R: Read>(mut reader: R, tx: mpsc::Sender<String>) {
    let mut report = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return,
            Ok(_) => {
                report.push(byte[0]);
                if byte[0] == REPORT_TERMINATOR {
                    let _ = tx.send(String::from_utf8_lossy(&report).into_owned());
                    return;
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return,
        }
    }
}

/// First of {delivery, deadline} wins.
///
/// A reader that dies without delivering (channel disconnect) still waits
/// out the deadline, so the caller observes the timeout at the configured
/// moment rather than an early failure. The reader thread itself is
/// abandoned, never force-cancelled.
fn await_report(rx: &mpsc::Receiver<String>, timeout: Duration) -> Option<String> {
    let deadline = Instant::now() + timeout;
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(report) => Some(report),
        Err(mpsc::RecvTimeoutError::Timeout) => None,
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            None
        }
    }
}

/// Pull `rows;cols` out of an `ESC [ rows ; cols R` report.
///
/// Mirrors a `%d;%dR` scan: the two leading bytes are skipped unseen and
/// any field that fails to scan is left at zero rather than failing the
/// probe, so a garbled report parses as 0x0.
fn parse_cursor_report(report: &str) -> TermSize {
    let mut size = TermSize { rows: 0, cols: 0 };
    let body = report.get(2..).unwrap_or("");

    let (rows, rest) = scan_field(body);
    let Some(rows) = rows else {
        return size;
    };
    size.rows = rows;

    let Some(rest) = rest.strip_prefix(';') else {
        return size;
    };
    if let (Some(cols), _) = scan_field(rest) {
        size.cols = cols;
    }
    size
}

/// Leading decimal run of `s`, if it parses, plus the remainder.
fn scan_field(s: &str) -> (Option<u16>, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    (s[..end].parse().ok(), &s[end..])
}
