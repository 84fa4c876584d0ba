//! Cooperative virtual-console release/acquire handshake with the kernel
//! (spec §4.6, §9 "signal-driven VT handoff").
//!
//! The state is a single process-wide `AtomicBool` written only by the
//! `SIGUSR1`/`SIGUSR2` handlers the kernel delivers on `VT_RELDISP`
//! negotiation. Handlers here perform only the flag set and the
//! acknowledgement ioctl — both async-signal-safe — never anything that
//! allocates or takes a lock.

use std::os::fd::RawFd;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// `true` while this process holds graphics master-ship and the event
/// core is expected to present frames; `false` while suspended for a VT
/// switch away.
static VT_ACTIVE: AtomicBool = AtomicBool::new(true);

/// Set by `SIGINT`/`SIGTERM`; the event core checks this once per loop
/// iteration and unwinds cleanly after the current iteration completes.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Last signal number observed by a handler, for diagnostics only.
static LAST_SIGNAL: AtomicI32 = AtomicI32::new(0);

/// fd of the controlling terminal, stashed for the signal handlers to
/// acknowledge release/acquire via `VT_RELDISP`. Set once at startup
/// before signal handlers are installed.
static mut TTY_FD: RawFd = -1;

const SIG_RELEASE: libc::c_int = libc::SIGUSR1;
const SIG_ACQUIRE: libc::c_int = libc::SIGUSR2;

pub struct VtArbiter {
    tty_fd: RawFd,
    original_mode: libc::vt_mode,
}

impl VtArbiter {
    /// Opens `/dev/tty`, switches it to `VT_PROCESS` mode with this
    /// process negotiating release (`SIGUSR1`) and acquire (`SIGUSR2`),
    /// and installs the signal handlers. The original VT mode is captured
    /// for restoration on shutdown.
    pub fn acquire() -> std::io::Result<Self> {
        let tty_fd = unsafe { libc::open(c"/dev/tty".as_ptr(), libc::O_RDWR) };
        if tty_fd < 0 {
            return Err(std::io::Error::last_os_error());
        }

        let mut original_mode: libc::vt_mode = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(tty_fd, libc::VT_GETMODE, &mut original_mode) } != 0 {
            let err = std::io::Error::last_os_error();
            unsafe { libc::close(tty_fd) };
            return Err(err);
        }

        let mut mode = original_mode;
        mode.mode = libc::VT_PROCESS;
        mode.relsig = SIG_RELEASE as i16;
        mode.acqsig = SIG_ACQUIRE as i16;
        if unsafe { libc::ioctl(tty_fd, libc::VT_SETMODE, &mode) } != 0 {
            let err = std::io::Error::last_os_error();
            unsafe { libc::close(tty_fd) };
            return Err(err);
        }

        unsafe {
            TTY_FD = tty_fd;
            libc::signal(SIG_RELEASE, handle_release as libc::sighandler_t);
            libc::signal(SIG_ACQUIRE, handle_acquire as libc::sighandler_t);
            libc::signal(libc::SIGINT, handle_shutdown_signal as libc::sighandler_t);
            libc::signal(libc::SIGTERM, handle_shutdown_signal as libc::sighandler_t);
            libc::signal(libc::SIGCHLD, handle_shutdown_signal as libc::sighandler_t);
        }

        Ok(Self {
            tty_fd,
            original_mode,
        })
    }

    /// `true` while graphics master-ship is held and frames should be
    /// presented; `false` while suspended for a VT switch.
    pub fn is_active(&self) -> bool {
        VT_ACTIVE.load(Ordering::SeqCst)
    }

    pub fn shutdown_requested(&self) -> bool {
        SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
    }

    pub fn last_signal(&self) -> i32 {
        LAST_SIGNAL.load(Ordering::SeqCst)
    }

    /// Restores the original VT mode. Best-effort; errors are logged, not
    /// propagated, since this always runs on a shutdown path.
    pub fn release(&mut self) {
        if unsafe { libc::ioctl(self.tty_fd, libc::VT_SETMODE, &self.original_mode) } != 0 {
            log::warn!(
                "failed to restore original VT mode: {}",
                std::io::Error::last_os_error()
            );
        }
        unsafe {
            libc::close(self.tty_fd);
        }
    }
}

impl Drop for VtArbiter {
    fn drop(&mut self) {
        self.release();
    }
}

extern "C" fn handle_release(_sig: libc::c_int) {
    VT_ACTIVE.store(false, Ordering::SeqCst);
    LAST_SIGNAL.store(SIG_RELEASE, Ordering::SeqCst);
    // SAFETY: async-signal-safe ioctl acknowledging the release; TTY_FD
    // was set once before handlers were installed and never mutated after.
    unsafe {
        libc::ioctl(TTY_FD, libc::VT_RELDISP, 1);
    }
}

extern "C" fn handle_acquire(_sig: libc::c_int) {
    LAST_SIGNAL.store(SIG_ACQUIRE, Ordering::SeqCst);
    unsafe {
        libc::ioctl(TTY_FD, libc::VT_RELDISP, libc::VT_ACKACQ);
    }
    VT_ACTIVE.store(true, Ordering::SeqCst);
}

extern "C" fn handle_shutdown_signal(sig: libc::c_int) {
    LAST_SIGNAL.store(sig, Ordering::SeqCst);
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}
