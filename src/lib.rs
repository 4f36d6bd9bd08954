//! remax - ask the terminal how big it really is.
//!
//! The kernel keeps a window-size record for every terminal, but that
//! record can go stale or never be set at all (serial consoles, some
//! pass-through sessions). The terminal device itself always knows its
//! real dimensions, so remax asks it directly: switch the terminal to raw
//! mode, park the cursor at row 9999 / column 9999 (the terminal clamps
//! the move to its actual last cell), request an ANSI cursor position
//! report, and read the answer back. By default the discovered size is
//! then written into the kernel's winsize record.
//!
//! The library half of the crate carries the protocol:
//!
//! - [`terminal`]: restorable raw-mode and winsize control of a single
//!   terminal descriptor.
//! - [`probe`]: the query/response round trip with its timeout and
//!   guaranteed attribute restoration.

#[cfg(not(unix))]
compile_error!("remax drives a Unix terminal (termios/ioctl); there is no non-Unix port");

pub mod probe;
pub mod terminal;
pub mod version;

pub use probe::{probe, ProbeError, ProbeOptions};
pub use terminal::{TermSize, Terminal, TerminalError};
