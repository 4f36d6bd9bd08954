//! Raw terminal attribute and window-size control.
//!
//! Wraps the termios and winsize ioctl surface of a single terminal
//! descriptor behind restorable operations. The attributes present at
//! acquisition are snapshotted exactly once and are the only thing
//! `restore` ever writes back.

use std::fmt;
use std::fs::File;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, RawFd};

use tracing::warn;

/// Terminal dimensions, rows by columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub rows: u16,
    pub cols: u16,
}

/// Errors from terminal attribute or window-size operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("file descriptor {fd} is not a terminal")]
    NotATerminal { fd: RawFd },

    #[error("tcgetattr({fd}): {source}")]
    GetAttr { fd: RawFd, source: io::Error },

    #[error("tcsetattr({fd}): {source}")]
    SetAttr { fd: RawFd, source: io::Error },

    #[error("ioctl({fd}, TIOCGWINSZ): {source}")]
    GetWinsize { fd: RawFd, source: io::Error },

    #[error("ioctl({fd}, TIOCSWINSZ): {source}")]
    SetWinsize { fd: RawFd, source: io::Error },

    #[error("dup({fd}): {source}")]
    Dup { fd: RawFd, source: io::Error },

    #[error("write({fd}): {source}")]
    Write { fd: RawFd, source: io::Error },
}

/// A terminal descriptor with its current and saved attribute snapshots.
///
/// The handle does not own the descriptor; it is released when the
/// underlying stream closes. Dropping the handle while raw mode is active
/// performs a best-effort restore.
pub struct Terminal {
    fd: RawFd,
    status: libc::termios,
    backup: libc::termios,
    raw: bool,
}

impl Terminal {
    /// Capture the current attributes of `stream`'s descriptor.
    ///
    /// The snapshot taken here is what [`Terminal::restore`] writes back;
    /// it is captured once, before any mutation. Fails if the descriptor
    /// is not a terminal or the attribute read fails.
    pub fn acquire<F: AsRawFd>(stream: &F) -> Result<Self, TerminalError> {
        let fd = stream.as_raw_fd();
        if unsafe { libc::isatty(fd) } != 1 {
            return Err(TerminalError::NotATerminal { fd });
        }
        let status = get_attrs(fd)?;
        Ok(Self {
            fd,
            status,
            backup: status,
            raw: false,
        })
    }

    /// Switch the descriptor into raw mode.
    ///
    /// The usual recipe: no break/parity handling, CR-LF translation or
    /// flow control on input; no output post-processing; no echo, canonical
    /// buffering, signal keys or extended input processing; 8-bit
    /// characters; and VMIN=1/VTIME=0 so a read returns as soon as a single
    /// byte is available. The current snapshot is updated only if the
    /// attribute write succeeds.
    pub fn enter_raw_mode(&mut self) -> Result<(), TerminalError> {
        let mut raw = self.status;
        raw.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        raw.c_oflag &= !libc::OPOST;
        raw.c_lflag &=
            !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        raw.c_cflag &= !(libc::CSIZE | libc::PARENB);
        raw.c_cflag |= libc::CS8;
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_attrs(self.fd, &raw)?;
        self.status = raw;
        self.raw = true;
        Ok(())
    }

    /// Write the attributes captured at acquisition back to the descriptor.
    ///
    /// Safe to call repeatedly; every call rewrites the same snapshot. Does
    /// not close the descriptor.
    pub fn restore(&mut self) -> Result<(), TerminalError> {
        set_attrs(self.fd, &self.backup)?;
        self.status = self.backup;
        self.raw = false;
        Ok(())
    }

    /// The kernel's current notion of the window geometry.
    pub fn window_size(&self) -> Result<TermSize, TerminalError> {
        let mut ws: libc::winsize = unsafe { mem::zeroed() };
        if unsafe { libc::ioctl(self.fd, libc::TIOCGWINSZ, &mut ws) } != 0 {
            return Err(TerminalError::GetWinsize {
                fd: self.fd,
                source: io::Error::last_os_error(),
            });
        }
        Ok(TermSize {
            rows: ws.ws_row,
            cols: ws.ws_col,
        })
    }

    /// Tell the kernel the window geometry is `size`.
    pub fn set_window_size(&self, size: TermSize) -> Result<(), TerminalError> {
        let ws = libc::winsize {
            ws_row: size.rows,
            ws_col: size.cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        if unsafe { libc::ioctl(self.fd, libc::TIOCSWINSZ, &ws) } != 0 {
            return Err(TerminalError::SetWinsize {
                fd: self.fd,
                source: io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    /// Write raw bytes to the terminal, bypassing stdio buffering.
    pub fn write_all(&self, mut buf: &[u8]) -> Result<(), TerminalError> {
        while !buf.is_empty() {
            let n = unsafe { libc::write(self.fd, buf.as_ptr().cast(), buf.len()) };
            if n < 0 {
                let source = io::Error::last_os_error();
                if source.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(TerminalError::Write {
                    fd: self.fd,
                    source,
                });
            }
            buf = &buf[n as usize..];
        }
        Ok(())
    }

    /// Duplicate the descriptor for a blocking reader.
    ///
    /// The returned file owns its own descriptor, so dropping it (or
    /// leaking it in an abandoned thread) never closes the terminal out
    /// from under the handle.
    pub fn reader(&self) -> Result<File, TerminalError> {
        let fd = unsafe { libc::dup(self.fd) };
        if fd < 0 {
            return Err(TerminalError::Dup {
                fd: self.fd,
                source: io::Error::last_os_error(),
            });
        }
        Ok(unsafe { File::from_raw_fd(fd) })
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("fd", &self.fd)
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.raw {
            if let Err(err) = self.restore() {
                warn!("failed to restore terminal attributes: {err}");
            }
        }
    }
}

fn get_attrs(fd: RawFd) -> Result<libc::termios, TerminalError> {
    let mut attrs: libc::termios = unsafe { mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut attrs) } != 0 {
        return Err(TerminalError::GetAttr {
            fd,
            source: io::Error::last_os_error(),
        });
    }
    Ok(attrs)
}

fn set_attrs(fd: RawFd, attrs: &libc::termios) -> Result<(), TerminalError> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, attrs) } != 0 {
        return Err(TerminalError::SetAttr {
            fd,
            source: io::Error::last_os_error(),
        });
    }
    Ok(())
}

/// Open an in-process pty pair for tests that need a real line discipline.
#[cfg(test)]
pub(crate) fn open_pty() -> (std::os::fd::OwnedFd, std::os::fd::OwnedFd) {
    use std::os::fd::OwnedFd;
    use std::ptr;

    let mut master: libc::c_int = 0;
    let mut slave: libc::c_int = 0;
    let rc = unsafe {
        libc::openpty(
            &mut master,
            &mut slave,
            ptr::null_mut(),
            ptr::null(),
            ptr::null(),
        )
    };
    assert_eq!(rc, 0, "openpty failed: {}", io::Error::last_os_error());
    unsafe { (OwnedFd::from_raw_fd(master), OwnedFd::from_raw_fd(slave)) }
}
