//! Control-plane IPC: a `SOCK_STREAM` Unix-domain socket at
//! `/tmp/<product>_<uid>.sock` carrying one raw command token per
//! connection (spec §4.8, §6).
//!
//! Raw `libc` socket calls are used instead of `std::os::unix::net`
//! because the spec pins an exact `listen` backlog (5) and a non-blocking
//! listener fd fed straight into the event core's `poll` set — both knobs
//! `UnixListener::bind` doesn't expose.

use std::io::{self, Read, Write};
use std::os::fd::RawFd;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::IpcError;

const BACKLOG: i32 = 5;
const MAX_COMMAND_BYTES: usize = 64;
const CLIENT_READ_DEADLINE: Duration = Duration::from_millis(200);

/// Normalized mutation requests the control plane can make against the
/// session model (spec §4.8 command vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewTab,
    Next,
    Prev,
    SplitVertical,
    FocusLeft,
    FocusRight,
}

impl Command {
    /// Long and short aliases, normalized to a single token each.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "--new-tab" | "-t" => Some(Command::NewTab),
            "--next" | "-n" => Some(Command::Next),
            "--prev" | "-p" => Some(Command::Prev),
            "--split-v" | "-s" => Some(Command::SplitVertical),
            "--left" | "-H" => Some(Command::FocusLeft),
            "--right" | "-L" => Some(Command::FocusRight),
            _ => None,
        }
    }

    /// Canonical long-form token, used by the client side to send.
    pub fn token(self) -> &'static str {
        match self {
            Command::NewTab => "--new-tab",
            Command::Next => "--next",
            Command::Prev => "--prev",
            Command::SplitVertical => "--split-v",
            Command::FocusLeft => "--left",
            Command::FocusRight => "--right",
        }
    }
}

/// `/tmp/<product>_<uid>.sock`, disambiguated by effective UID (spec §6).
pub fn socket_path(product: &str) -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/{product}_{uid}.sock"))
}

fn sockaddr_un(path: &std::path::Path) -> io::Result<(libc::sockaddr_un, libc::socklen_t)> {
    let bytes = path.as_os_str().as_encoded_bytes();
    if bytes.len() >= 108 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "socket path too long for sun_path",
        ));
    }
    let mut addr: libc::sockaddr_un = unsafe { std::mem::zeroed() };
    addr.sun_family = libc::AF_UNIX as libc::sa_family_t;
    for (dst, &src) in addr.sun_path.iter_mut().zip(bytes.iter()) {
        *dst = src as libc::c_char;
    }
    let len = (std::mem::size_of::<libc::sa_family_t>() + bytes.len() + 1) as libc::socklen_t;
    Ok((addr, len))
}

/// The IPC listener half: owns a non-blocking, bound-and-listening socket
/// fd the event core polls alongside pane masters and stdin.
pub struct IpcServer {
    fd: RawFd,
    path: PathBuf,
}

impl IpcServer {
    /// Unlinks any stale socket at `path`, binds, listens with backlog
    /// `5`, and switches to non-blocking mode (spec §4.8 "Server
    /// bootstrap").
    pub fn bind(path: PathBuf) -> Result<Self, IpcError> {
        let _ = std::fs::remove_file(&path);

        let fd = unsafe { libc::socket(libc::AF_UNIX, libc::SOCK_STREAM, 0) };
        if fd < 0 {
            return Err(IpcError::Io(io::Error::last_os_error()));
        }
        let (addr, len) = sockaddr_un(&path).map_err(IpcError::Io)?;
        let bind_result = unsafe {
            libc::bind(
                fd,
                (&addr as *const libc::sockaddr_un).cast(),
                len,
            )
        };
        if bind_result != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(IpcError::Io(err));
        }
        if unsafe { libc::listen(fd, BACKLOG) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(IpcError::Io(err));
        }

        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags >= 0 {
            unsafe {
                libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
            }
        }

        Ok(Self { fd, path })
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Accepts one pending connection (if any) and reads a single command
    /// token from it with a 200ms deadline, closing the client afterward.
    /// Returns `Ok(None)` if nothing was pending, `Ok(Some(cmd))` on a
    /// recognized token, and `Err` for an unrecognized token or I/O
    /// failure — both logged by the caller, neither fatal.
    pub fn accept_one(&self) -> Result<Option<Command>, IpcError> {
        let client_fd = unsafe { libc::accept(self.fd, std::ptr::null_mut(), std::ptr::null_mut()) };
        if client_fd < 0 {
            let err = io::Error::last_os_error();
            return match err.raw_os_error() {
                Some(libc::EAGAIN) | Some(libc::EWOULDBLOCK) => Ok(None),
                _ => Err(IpcError::Io(err)),
            };
        }

        // SAFETY: we own this fd exclusively from here on.
        let mut stream = unsafe { <UnixStream as std::os::fd::FromRawFd>::from_raw_fd(client_fd) };
        let _ = stream.set_read_timeout(Some(CLIENT_READ_DEADLINE));

        let mut buf = [0u8; MAX_COMMAND_BYTES];
        let n = match stream.read(&mut buf) {
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Err(IpcError::Timeout);
            }
            Err(e) => return Err(IpcError::Io(e)),
        };
        if n == 0 {
            return Err(IpcError::Timeout);
        }

        let token = String::from_utf8_lossy(&buf[..n]).trim().to_string();
        Command::parse(&token).map(Some).ok_or(IpcError::BadToken(token))
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Tries to connect to an already-running server's socket. `Ok(true)`
/// means another instance is live and reachable; `Ok(false)` means no
/// server is listening (the caller should become the server itself).
pub fn probe_existing_server(path: &std::path::Path) -> bool {
    UnixStream::connect(path).is_ok()
}

/// Connects to the running server and sends one command token, then
/// closes. Used by the CLI-client invocation path.
pub fn send_command(path: &std::path::Path, command: Command) -> io::Result<()> {
    let mut stream = UnixStream::connect(path)?;
    stream.write_all(command.token().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_path_embeds_product_and_uid() {
        let path = socket_path("cinderbox");
        let s = path.to_string_lossy();
        assert!(s.starts_with("/tmp/cinderbox_"));
        assert!(s.ends_with(".sock"));
    }

    #[test]
    fn parse_recognizes_every_long_token() {
        assert_eq!(Command::parse("--new-tab"), Some(Command::NewTab));
        assert_eq!(Command::parse("--next"), Some(Command::Next));
        assert_eq!(Command::parse("--prev"), Some(Command::Prev));
        assert_eq!(Command::parse("--split-v"), Some(Command::SplitVertical));
        assert_eq!(Command::parse("--left"), Some(Command::FocusLeft));
        assert_eq!(Command::parse("--right"), Some(Command::FocusRight));
    }

    #[test]
    fn parse_rejects_unknown_token() {
        assert_eq!(Command::parse("--bogus"), None);
    }

    #[test]
    fn token_round_trips_through_parse() {
        for cmd in [
            Command::NewTab,
            Command::Next,
            Command::Prev,
            Command::SplitVertical,
            Command::FocusLeft,
            Command::FocusRight,
        ] {
            assert_eq!(Command::parse(cmd.token()), Some(cmd));
        }
    }

    #[test]
    fn bind_accept_send_round_trip() {
        let path = std::env::temp_dir().join(format!("cinderbox-test-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let server = IpcServer::bind(path.clone()).expect("bind should succeed in a sandbox with /tmp");

        assert!(send_command(&path, Command::SplitVertical).is_ok());

        let mut result = None;
        for _ in 0..50 {
            match server.accept_one() {
                Ok(Some(cmd)) => {
                    result = Some(cmd);
                    break;
                }
                Ok(None) => std::thread::sleep(std::time::Duration::from_millis(10)),
                Err(_) => break,
            }
        }
        assert_eq!(result, Some(Command::SplitVertical));
    }
}
