use super::RateLimiter;
use crate::clock::Clock;
use crate::middleware::PacingMiddleware;
use crate::schedule::Direction;
use std::io::{self, Read, Write};

/// Size of the blocks that [`RateLimiter::send_file`] reads from its source.
pub const FILE_BLOCK_SIZE: usize = 1024;

/// # Paced blocking I/O
impl<C, MW> RateLimiter<C, MW>
where
    C: Clock,
    MW: PacingMiddleware,
{
    /// Writes `buf` to `sink` at the configured rate.
    ///
    /// The buffer is cut into chunks of at most
    /// [`max_chunk`][RateLimiter::max_chunk] bytes. Each chunk first waits
    /// for its slot on the send schedule, then is written in full (retrying
    /// interrupted and partial writes). The time the write takes is credited
    /// against the waits of later chunks.
    ///
    /// Returns the number of bytes written. That is less than `buf.len()`
    /// only if the sink stopped accepting data (a write returned `Ok(0)`).
    /// Any other write error aborts the send and is returned.
    ///
    /// With an unlimited rate this is exactly one call to `sink.write(buf)`.
    pub fn send<W: Write + ?Sized>(&self, sink: &mut W, buf: &[u8]) -> io::Result<usize> {
        let rate = self.rate_bps();
        if rate == 0 {
            return sink.write(buf);
        }

        let mut sent = 0;
        for chunk in buf.chunks(self.max_chunk().get()) {
            let delay = self.reserve(Direction::Send, chunk.len(), rate);
            self.clock.sleep(delay);

            let start = self.clock.now();
            let written = send_all(sink, chunk)?;
            self.book(Direction::Send, written, self.clock.now().since(start));

            sent += written;
            if written < chunk.len() {
                break;
            }
        }
        Ok(sent)
    }

    /// Reads at most one chunk from `source` into `buf`, pacing the caller
    /// to the configured rate.
    ///
    /// This issues a single `read` of up to
    /// [`max_chunk`][RateLimiter::max_chunk] bytes. The data is in `buf`
    /// as soon as it arrives, but the call only returns once the bytes
    /// actually received have been paid for on the receive schedule, which
    /// delays the caller's next receive.
    ///
    /// Errors and end-of-stream (`Ok(0)`) are returned unchanged and without
    /// any wait. With an unlimited rate this is exactly one call to
    /// `source.read(buf)`.
    pub fn receive<R: Read + ?Sized>(&self, source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        let rate = self.rate_bps();
        if rate == 0 {
            return source.read(buf);
        }

        let len = buf.len().min(self.max_chunk().get());
        let start = self.clock.now();
        let received = source.read(&mut buf[..len])?;
        if received == 0 {
            return Ok(0);
        }
        let elapsed = self.clock.now().since(start);

        let delay = self.settle_receive(received, rate, elapsed);
        self.clock.sleep(delay);
        Ok(received)
    }

    /// Copies up to `count` bytes from `source` to `sink` at the configured
    /// rate, starting at the source's current position.
    ///
    /// The source is read in blocks of [`FILE_BLOCK_SIZE`] bytes (never
    /// reading past `count`), and each block goes through
    /// [`send`][RateLimiter::send]. Interrupted reads are retried.
    ///
    /// Returns the number of bytes copied. If the source runs dry, or the
    /// sink stops accepting data, before `count` bytes were copied, the
    /// shorter count is returned; that is not an error.
    ///
    /// With an unlimited rate this is [`io::copy`] from `source` limited to
    /// `count` bytes.
    pub fn send_file<W, R>(&self, sink: &mut W, source: &mut R, count: u64) -> io::Result<u64>
    where
        W: Write + ?Sized,
        R: Read + ?Sized,
    {
        if self.rate_bps() == 0 {
            let mut limited = Read::take(&mut *source, count);
            return io::copy(&mut limited, sink);
        }

        let mut block = [0u8; FILE_BLOCK_SIZE];
        let mut sent: u64 = 0;
        while sent < count {
            let want = usize::try_from(count - sent)
                .map_or(FILE_BLOCK_SIZE, |left| left.min(FILE_BLOCK_SIZE));
            let read = match source.read(&mut block[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let written = self.send(sink, &block[..read])?;
            sent += written as u64;
            if written < read {
                break;
            }
        }
        Ok(sent)
    }
}

/// Writes all of `buf` to `sink`, retrying interrupted and partial writes.
///
/// Stops early, without an error, when the sink accepts zero bytes; the
/// return value is the number of bytes the sink took.
pub(crate) fn send_all<W: Write + ?Sized>(sink: &mut W, mut buf: &[u8]) -> io::Result<usize> {
    let len = buf.len();
    while !buf.is_empty() {
        match sink.write(buf) {
            Ok(0) => break,
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(len - buf.len())
}
