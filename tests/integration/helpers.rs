//! Shared helpers for CLI integration tests.

use std::io::{Read, Write};
use std::thread;

use portable_pty::{native_pty_system, CommandBuilder, ExitStatus, PtySize};

/// Everything observed from one scripted run of the binary inside a pty.
pub struct PtyRun {
    pub status: ExitStatus,
    /// Bytes the child wrote to the pty (stdout, stderr and the escape
    /// query itself), lossily decoded.
    pub output: String,
    /// The pty's winsize record after the child exited.
    pub final_size: PtySize,
}

/// Run the remax binary inside a 24x80 pty whose master side plays the
/// terminal: when the cursor position query arrives it answers with
/// `reply`, or stays silent when `reply` is `None`.
pub fn run_in_pty(args: &[&str], reply: Option<&'static [u8]>) -> PtyRun {
    let pty = native_pty_system();
    let pair = pty
        .openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })
        .expect("openpty");

    let mut cmd = CommandBuilder::new(env!("CARGO_BIN_EXE_remax"));
    cmd.args(args);
    let mut child = pair.slave.spawn_command(cmd).expect("spawn remax");
    // Only the child holds slave descriptors now, so the reader below sees
    // EOF once it exits.
    drop(pair.slave);

    let mut reader = pair.master.try_clone_reader().expect("clone reader");
    let mut writer = pair.master.take_writer().expect("take writer");

    let responder = thread::spawn(move || {
        let mut output = Vec::new();
        let mut byte = [0u8; 1];
        let mut replied = false;
        while reader.read(&mut byte).map(|n| n > 0).unwrap_or(false) {
            output.push(byte[0]);
            if !replied && output.ends_with(b"\x1b[6n") {
                if let Some(reply) = reply {
                    writer.write_all(reply).expect("write reply");
                    writer.flush().expect("flush reply");
                }
                replied = true;
            }
        }
        output
    });

    let status = child.wait().expect("wait for remax");
    let output = responder.join().expect("join responder");
    let final_size = pair.master.get_size().expect("get pty size");

    PtyRun {
        status,
        output: String::from_utf8_lossy(&output).into_owned(),
        final_size,
    }
}
