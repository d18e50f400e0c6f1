//! Sockets with per-call `send(2)`/`recv(2)` flags.
//!
//! The standard library's socket types always pass zero flags. Wrap a
//! socket in a [`FlaggedSocket`] to choose them, and hand the wrapper to
//! a [`RateLimiter`][crate::RateLimiter] like any other reader or writer:
//!
//! ```rust,no_run
//! # use ratepace::{Bandwidth, RateLimiter, FlaggedSocket};
//! # use std::net::TcpStream;
//! # fn main() -> std::io::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:9000")?;
//! let lim = RateLimiter::new(Bandwidth::kbps(256));
//! let mut sock = FlaggedSocket::new(&stream).send_flags(libc::MSG_DONTROUTE);
//! lim.send(&mut sock, b"hello")?;
//! # Ok(())
//! # }
//! ```

use libc::{c_int, c_void};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;

/// A borrowed socket whose reads and writes go through `recv(2)` and
/// `send(2)` with fixed flags.
#[derive(Debug)]
pub struct FlaggedSocket<'a, S: AsRawFd + ?Sized> {
    socket: &'a S,
    send_flags: c_int,
    recv_flags: c_int,
}

impl<'a, S: AsRawFd + ?Sized> FlaggedSocket<'a, S> {
    /// Wraps `socket` with no flags set in either direction.
    pub fn new(socket: &'a S) -> Self {
        FlaggedSocket {
            socket,
            send_flags: 0,
            recv_flags: 0,
        }
    }

    /// Sets the flags passed to every `send(2)`.
    pub fn send_flags(self, flags: c_int) -> Self {
        FlaggedSocket {
            send_flags: flags,
            ..self
        }
    }

    /// Sets the flags passed to every `recv(2)`.
    pub fn recv_flags(self, flags: c_int) -> Self {
        FlaggedSocket {
            recv_flags: flags,
            ..self
        }
    }
}

impl<S: AsRawFd + ?Sized> Write for FlaggedSocket<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Safety: `buf` is valid for `buf.len()` bytes for the whole call.
        let n = unsafe {
            libc::send(
                self.socket.as_raw_fd(),
                buf.as_ptr() as *const c_void,
                buf.len(),
                self.send_flags,
            )
        };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: AsRawFd + ?Sized> Read for FlaggedSocket<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Safety: `buf` is valid and writable for `buf.len()` bytes.
        let n = unsafe {
            libc::recv(
                self.socket.as_raw_fd(),
                buf.as_mut_ptr() as *mut c_void,
                buf.len(),
                self.recv_flags,
            )
        };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }
}
