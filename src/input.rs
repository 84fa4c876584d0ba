//! Raw-mode stdin: the process's standard input kept 8-bit clean, with no
//! echo, no canonical line buffering, and no signal generation, so every
//! byte the user types reaches the active pane untouched (spec §4.7).
//!
//! `VMIN=0`/`VTIME=0` makes `read` return immediately with whatever is
//! available (possibly nothing) rather than blocking for a full line —
//! the event core still waits for readiness via `poll`, this only removes
//! the kernel's line-discipline buffering in between.

use std::io;
use std::os::fd::RawFd;

const STDIN_FD: RawFd = 0;

/// Scoped guard: captures the original termios at construction and
/// restores it on drop, so every exit path (normal return, early error,
/// or unwind) leaves the terminal usable again.
pub struct RawModeGuard {
    original: libc::termios,
    restored: bool,
}

impl RawModeGuard {
    pub fn install() -> io::Result<Self> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(STDIN_FD, &mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(STDIN_FD, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            original,
            restored: false,
        })
    }

    /// Restores the original termios. Safe to call more than once.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if unsafe { libc::tcsetattr(STDIN_FD, libc::TCSANOW, &self.original) } != 0 {
            log::warn!("failed to restore termios: {}", io::Error::last_os_error());
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Reads whatever is currently available on stdin into `buf`, forwarding
/// unchanged to the caller (which writes it to the active pane's PTY).
/// Returns `Ok(0)` if nothing was available (VMIN=0 read with no data).
pub fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    let n = unsafe { libc::read(STDIN_FD, buf.as_mut_ptr().cast(), buf.len()) };
    if n >= 0 {
        Ok(n as usize)
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_and_restore_round_trips_without_error() {
        // Only meaningful when stdin is actually a tty; in CI sandboxes it
        // is frequently a pipe, where tcgetattr fails with ENOTTY — that's
        // an expected environment gap, not a bug in the guard.
        match RawModeGuard::install() {
            Ok(mut guard) => guard.restore(),
            Err(e) => {
                assert!(e.raw_os_error() == Some(libc::ENOTTY) || e.raw_os_error().is_some());
            }
        }
    }
}
