use super::{RateLimiter, FILE_BLOCK_SIZE};
use crate::clock::ReasonablyRealtime;
use crate::middleware::PacingMiddleware;
use crate::schedule::Direction;
use futures::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use futures_timer::Delay;
use std::io;
use std::time::Duration;

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        Delay::new(delay).await;
    }
}

/// # Paced asynchronous I/O
///
/// These share their schedules with the blocking methods, so blocking and
/// asynchronous transfers through the same limiter draw on one budget.
impl<C, MW> RateLimiter<C, MW>
where
    C: ReasonablyRealtime,
    MW: PacingMiddleware,
{
    /// Writes `buf` to `sink` at the configured rate; the asynchronous
    /// counterpart of [`send`][RateLimiter::send].
    pub async fn send_async<W>(&self, sink: &mut W, buf: &[u8]) -> io::Result<usize>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let rate = self.rate_bps();
        if rate == 0 {
            return sink.write(buf).await;
        }

        let mut sent = 0;
        for chunk in buf.chunks(self.max_chunk().get()) {
            pause(self.reserve(Direction::Send, chunk.len(), rate)).await;

            let start = self.clock.now();
            let written = send_all_async(sink, chunk).await?;
            self.book(Direction::Send, written, self.clock.now().since(start));

            sent += written;
            if written < chunk.len() {
                break;
            }
        }
        Ok(sent)
    }

    /// Reads at most one chunk from `source` into `buf`, pacing the caller;
    /// the asynchronous counterpart of [`receive`][RateLimiter::receive].
    pub async fn receive_async<R>(&self, source: &mut R, buf: &mut [u8]) -> io::Result<usize>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let rate = self.rate_bps();
        if rate == 0 {
            return source.read(buf).await;
        }

        let len = buf.len().min(self.max_chunk().get());
        let start = self.clock.now();
        let received = source.read(&mut buf[..len]).await?;
        if received == 0 {
            return Ok(0);
        }
        let elapsed = self.clock.now().since(start);

        pause(self.settle_receive(received, rate, elapsed)).await;
        Ok(received)
    }

    /// Copies up to `count` bytes from `source` to `sink` at the configured
    /// rate; the asynchronous counterpart of
    /// [`send_file`][RateLimiter::send_file].
    pub async fn send_file_async<W, R>(
        &self,
        sink: &mut W,
        source: &mut R,
        count: u64,
    ) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
        R: AsyncRead + Unpin + ?Sized,
    {
        if self.rate_bps() == 0 {
            return futures::io::copy((&mut *source).take(count), sink).await;
        }

        let mut block = [0u8; FILE_BLOCK_SIZE];
        let mut sent: u64 = 0;
        while sent < count {
            let want = usize::try_from(count - sent)
                .map_or(FILE_BLOCK_SIZE, |left| left.min(FILE_BLOCK_SIZE));
            let read = match source.read(&mut block[..want]).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let written = self.send_async(sink, &block[..read]).await?;
            sent += written as u64;
            if written < read {
                break;
            }
        }
        Ok(sent)
    }
}

async fn send_all_async<W>(sink: &mut W, mut buf: &[u8]) -> io::Result<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let len = buf.len();
    while !buf.is_empty() {
        match sink.write(buf).await {
            Ok(0) => break,
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(len - buf.len())
}
