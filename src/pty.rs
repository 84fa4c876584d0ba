//! Raw POSIX pseudo-terminal plumbing: master acquisition, non-blocking
//! mode, child spawn over the slave side, window-size ioctls, and the
//! bounded-retry write path described in spec §4.3/§5.
//!
//! No PTY-handling crate is used here deliberately: the event core needs a
//! bare, non-blocking master file descriptor it can hand straight to
//! `poll`, and a write path with precise control over the retry/backoff
//! count — a `portable_pty`-style abstraction hides exactly the knobs this
//! program needs to turn.

use std::ffi::CString;
use std::io;
use std::os::fd::RawFd;

use crate::error::PaneError;

/// Bound on `write` retries when the master's buffer stays full. Each
/// retry waits up to 100ms on `POLLOUT` before trying again, so this is
/// wall-clock 5s worst case per write call (spec §9 open question resolved:
/// this is a per-call bound, not a whole-run budget).
const WRITE_RETRY_LIMIT: u32 = 50;
const WRITE_RETRY_POLL_MS: i32 = 100;

/// An owned PTY master fd plus the child it drives. Closing the master and
/// reaping the child are both the caller's responsibility (via
/// [`PtyMaster::close_master`] and [`PtyMaster::reap`]) so that EOF/EIO can
/// be observed before the descriptor disappears.
pub struct PtyMaster {
    fd: RawFd,
}

impl PtyMaster {
    /// Opens a fresh PTY pair, forks, and execs `shell` on the slave side
    /// with `rows`x`cols` text cells mapped to `pixel_width`x`pixel_height`
    /// pixels (communicated to the kernel via `TIOCSWINSZ` before exec).
    ///
    /// Returns the non-blocking master plus the child's pid.
    pub fn spawn(
        shell: &str,
        rows: u16,
        cols: u16,
        pixel_width: u16,
        pixel_height: u16,
    ) -> Result<(Self, libc::pid_t), PaneError> {
        let master_fd = open_master()?;
        grant_and_unlock(master_fd)?;
        let slave_path = ptsname(master_fd)?;

        set_winsize(master_fd, rows, cols, pixel_width, pixel_height)
            .map_err(|e| PaneError::SpawnFailed(format!("winsize on master: {e}")))?;

        // SAFETY: single-threaded at this point in the process lifetime
        // (called only during startup or from the event-core loop, never
        // concurrently with another fork). The child performs only
        // async-signal-safe operations before exec.
        let pid = unsafe { libc::fork() };
        if pid < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(master_fd) };
            return Err(PaneError::SpawnFailed(format!("fork: {err}")));
        }

        if pid == 0 {
            // Child: never returns.
            child_exec(master_fd, &slave_path, shell);
        }

        set_nonblocking(master_fd).map_err(|e| PaneError::SpawnFailed(e.to_string()))?;

        Ok((Self { fd: master_fd }, pid))
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Reads up to `buf.len()` bytes. `Ok(0)` means EOF (child's slave
    /// closed); `Err` with `ErrorKind::WouldBlock` means "nothing ready
    /// right now" under non-blocking mode; any other error (notably EIO,
    /// which Linux returns once the slave side is fully gone) is a real
    /// termination signal.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n >= 0 {
            return Ok(n as usize);
        }
        Err(io::Error::last_os_error())
    }

    /// Writes `buf` in full, retrying `EINTR` immediately and backing off
    /// on `EAGAIN`/`EWOULDBLOCK` by waiting on `POLLOUT` up to
    /// [`WRITE_RETRY_LIMIT`] times. Returns [`PaneError::WriteStalled`] if
    /// the retry budget is exhausted before all bytes are accepted by the
    /// kernel — callers never observe a short write.
    pub fn write_all_retry(&self, buf: &[u8]) -> Result<(), PaneError> {
        let mut offset = 0;
        let mut retries = 0u32;
        while offset < buf.len() {
            let n = unsafe {
                libc::write(
                    self.fd,
                    buf[offset..].as_ptr().cast(),
                    buf.len() - offset,
                )
            };
            if n >= 0 {
                offset += n as usize;
                retries = 0;
                continue;
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EINTR) => continue,
                Some(libc::EAGAIN) => {
                    if retries >= WRITE_RETRY_LIMIT {
                        return Err(PaneError::WriteStalled);
                    }
                    retries += 1;
                    wait_for_writable(self.fd, WRITE_RETRY_POLL_MS);
                }
                _ => return Err(PaneError::PtyIoError(err)),
            }
        }
        Ok(())
    }

    /// Updates the PTY's cell and pixel dimensions; the kernel delivers
    /// `SIGWINCH` to the foreground process group of the slave as a side
    /// effect.
    pub fn resize(
        &self,
        rows: u16,
        cols: u16,
        pixel_width: u16,
        pixel_height: u16,
    ) -> io::Result<()> {
        set_winsize(self.fd, rows, cols, pixel_width, pixel_height)
    }

    /// Closes the master fd. Idempotent-by-construction: callers only
    /// invoke this once, on EOF/EIO detection, then drop the `PtyMaster`.
    pub fn close_master(&self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// Non-blocking reap: returns `Some(exit status)` once the child has
/// exited, `None` if it's still running. Never blocks the event loop.
pub fn reap(pid: libc::pid_t) -> Option<i32> {
    let mut status: i32 = 0;
    let r = unsafe { libc::waitpid(pid, &mut status, libc::WNOHANG) };
    if r == pid { Some(status) } else { None }
}

fn open_master() -> Result<RawFd, PaneError> {
    let fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
    if fd < 0 {
        return Err(PaneError::SpawnFailed(format!(
            "posix_openpt: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(fd)
}

fn grant_and_unlock(fd: RawFd) -> Result<(), PaneError> {
    if unsafe { libc::grantpt(fd) } != 0 {
        return Err(PaneError::SpawnFailed(format!(
            "grantpt: {}",
            io::Error::last_os_error()
        )));
    }
    if unsafe { libc::unlockpt(fd) } != 0 {
        return Err(PaneError::SpawnFailed(format!(
            "unlockpt: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

fn ptsname(fd: RawFd) -> Result<CString, PaneError> {
    // SAFETY: ptsname returns a pointer to a static buffer; this process
    // never calls it from more than one thread at a time, so the
    // non-reentrant API is safe here.
    let ptr = unsafe { libc::ptsname(fd) };
    if ptr.is_null() {
        return Err(PaneError::SpawnFailed(format!(
            "ptsname: {}",
            io::Error::last_os_error()
        )));
    }
    let cstr = unsafe { std::ffi::CStr::from_ptr(ptr) };
    Ok(CString::new(cstr.to_bytes()).expect("ptsname output contains no NUL"))
}

fn set_winsize(
    fd: RawFd,
    rows: u16,
    cols: u16,
    pixel_width: u16,
    pixel_height: u16,
) -> io::Result<()> {
    let ws = libc::winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: pixel_width,
        ws_ypixel: pixel_height,
    };
    let r = unsafe { libc::ioctl(fd, libc::TIOCSWINSZ, &ws) };
    if r != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    let r = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if r < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn wait_for_writable(fd: RawFd, timeout_ms: i32) {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    unsafe {
        libc::poll(&mut pfd, 1, timeout_ms);
    }
}

/// Child-side setup: new session, controlling terminal, stdio redirected
/// to the slave, then exec. Never returns — on any failure it `_exit(127)`
/// rather than unwinding back into the parent's Rust state.
fn child_exec(master_fd: RawFd, slave_path: &std::ffi::CStr, shell: &str) -> ! {
    unsafe {
        libc::close(master_fd);

        if libc::setsid() < 0 {
            libc::_exit(127);
        }

        let slave_fd = libc::open(slave_path.as_ptr(), libc::O_RDWR);
        if slave_fd < 0 {
            libc::_exit(127);
        }

        // Establish the slave as this session's controlling terminal.
        if libc::ioctl(slave_fd, libc::TIOCSCTTY, 0) != 0 {
            libc::_exit(127);
        }

        libc::dup2(slave_fd, 0);
        libc::dup2(slave_fd, 1);
        libc::dup2(slave_fd, 2);
        if slave_fd > 2 {
            libc::close(slave_fd);
        }

        let term = CString::new("TERM=xterm-256color").unwrap();
        libc::putenv(term.into_raw());

        let Ok(shell_c) = CString::new(shell) else {
            libc::_exit(127);
        };
        let argv: [*const libc::c_char; 2] = [shell_c.as_ptr(), std::ptr::null()];
        libc::execvp(shell_c.as_ptr(), argv.as_ptr());
        // execvp only returns on failure.
        libc::_exit(127);
    }
}

/// Resolves the shell to launch in each pane: the configured override,
/// else `$SHELL`, else `/bin/sh`.
pub fn resolve_shell(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("SHELL").ok())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_shell_prefers_configured() {
        assert_eq!(resolve_shell(Some("/bin/zsh")), "/bin/zsh");
    }

    #[test]
    fn resolve_shell_falls_back_to_env_or_sh() {
        let resolved = resolve_shell(None);
        assert!(!resolved.is_empty());
    }

    #[test]
    fn spawn_and_tear_down_a_real_shell() {
        let (master, pid) = PtyMaster::spawn("/bin/sh", 24, 80, 800, 480)
            .expect("spawning /bin/sh must succeed in a sandbox with a PTY subsystem");
        assert!(pid > 0);

        // Give the child a moment to start, then ask it to exit so `reap`
        // has something to observe without blocking the test runner.
        let _ = master.write_all_retry(b"exit\n");

        let mut buf = [0u8; 4096];
        let mut saw_eof_or_data = false;
        for _ in 0..200 {
            match master.read(&mut buf) {
                Ok(0) => {
                    saw_eof_or_data = true;
                    break;
                }
                Ok(_) => saw_eof_or_data = true,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
                Err(_) => {
                    saw_eof_or_data = true;
                    break;
                }
            }
        }
        assert!(saw_eof_or_data);
        master.close_master();
    }
}
