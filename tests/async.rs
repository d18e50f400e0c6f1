#![cfg(feature = "async")]

use all_asserts::*;
use crossbeam::channel::{self, Receiver, Sender};
use futures::executor::block_on;
use futures::io::{AsyncWrite, Cursor};
use nonzero_ext::nonzero;
use ratepace::{Bandwidth, Direction, RateLimiter};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;
use std::time::{Duration, Instant};

fn limiter() -> RateLimiter {
    // 10000 bytes per second, 50ms per 500-byte chunk.
    RateLimiter::new(Bandwidth::kbps(80).allow_chunk(nonzero!(500usize)))
}

#[test]
fn send_pauses() {
    let lim = limiter();
    let mut sink = Cursor::new(Vec::new());
    let i = Instant::now();

    assert_eq!(block_on(lim.send_async(&mut sink, &[7u8; 2000])).unwrap(), 2000);
    assert_eq!(sink.into_inner(), vec![7u8; 2000]);
    assert_ge!(i.elapsed(), Duration::from_millis(190));
    assert_le!(i.elapsed(), Duration::from_secs(1));
}

#[test]
fn receive_pauses() {
    let lim = limiter();
    let mut source: &[u8] = &[8u8; 700];
    let mut buf = [0u8; 1000];
    let i = Instant::now();

    assert_eq!(block_on(lim.receive_async(&mut source, &mut buf)).unwrap(), 500);
    assert_eq!(block_on(lim.receive_async(&mut source, &mut buf)).unwrap(), 200);
    assert_eq!(block_on(lim.receive_async(&mut source, &mut buf)).unwrap(), 0);
    // 700 bytes are worth 70ms.
    assert_ge!(i.elapsed(), Duration::from_millis(65));
    assert_le!(i.elapsed(), Duration::from_secs(1));
}

#[test]
fn send_file_copies_the_count() {
    let lim = RateLimiter::new(Bandwidth::bps(819_200));
    let data: Vec<u8> = (0..4000u32).map(|i| i as u8).collect();
    let mut source: &[u8] = &data;
    let mut sink = Cursor::new(Vec::new());
    let i = Instant::now();

    assert_eq!(
        block_on(lim.send_file_async(&mut sink, &mut source, 3072)).unwrap(),
        3072
    );
    assert_eq!(sink.into_inner(), &data[..3072]);
    assert_eq!(source.len(), 4000 - 3072);
    // Three 1024-byte blocks at 102400 bytes per second.
    assert_ge!(i.elapsed(), Duration::from_millis(25));
}

#[test]
fn unlimited_passes_straight_through() {
    let lim = RateLimiter::unlimited();
    let mut sink = Cursor::new(Vec::new());
    assert_eq!(block_on(lim.send_async(&mut sink, &[1u8; 50_000])).unwrap(), 50_000);

    let mut source: &[u8] = &[2u8; 50_000];
    let mut buf = vec![0u8; 40_000];
    assert_eq!(
        block_on(lim.receive_async(&mut source, &mut buf)).unwrap(),
        40_000
    );

    let mut source: &[u8] = &[3u8; 50_000];
    let mut sink = Cursor::new(Vec::new());
    assert_eq!(
        block_on(lim.send_file_async(&mut sink, &mut source, 30_000)).unwrap(),
        30_000
    );
    assert_eq!(source.len(), 20_000);
}

#[test]
fn blocking_and_async_share_a_budget() {
    let lim = limiter();
    let i = Instant::now();

    lim.send(&mut std::io::sink(), &[0u8; 1000]).unwrap();
    let mut sink = Cursor::new(Vec::new());
    block_on(lim.send_async(&mut sink, &[0u8; 1000])).unwrap();
    assert_ge!(i.elapsed(), Duration::from_millis(190));
}

#[test]
fn many_tasks_share_one_limiter() {
    let lim = Arc::new(limiter());
    let i = Instant::now();

    let children: Vec<_> = (0..4)
        .map(|_| {
            let lim = Arc::clone(&lim);
            thread::spawn(move || {
                let mut sink = Cursor::new(Vec::new());
                block_on(lim.send_async(&mut sink, &[0u8; 500])).unwrap()
            })
        })
        .collect();
    for child in children {
        assert_eq!(child.join().unwrap(), 500);
    }
    assert_ge!(i.elapsed(), Duration::from_millis(190));
    assert_ge!(lim.snapshot(Direction::Send).credit_secs(), 0.0);
}

/// A sink whose first write stays blocked until another task reports that
/// its own send went through (or a deadline passes).
struct WaitForPeer {
    entered: Sender<()>,
    peer_done: Receiver<()>,
    saw_peer: bool,
}

impl AsyncWrite for WaitForPeer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let _ = this.entered.try_send(());
        this.saw_peer = this.peer_done.recv_timeout(Duration::from_secs(2)).is_ok();
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[test]
fn a_blocked_send_does_not_hold_up_other_senders() {
    let lim = Arc::new(limiter());
    let (entered, entered_rx) = channel::bounded(1);
    let (done_tx, peer_done) = channel::bounded(1);

    let first = {
        let lim = Arc::clone(&lim);
        thread::spawn(move || {
            let mut stuck = WaitForPeer {
                entered,
                peer_done,
                saw_peer: false,
            };
            assert_eq!(block_on(lim.send_async(&mut stuck, &[1u8; 500])).unwrap(), 500);
            stuck.saw_peer
        })
    };

    entered_rx.recv().unwrap();
    let mut sink = Cursor::new(Vec::new());
    assert_eq!(block_on(lim.send_async(&mut sink, &[2u8; 500])).unwrap(), 500);
    done_tx.send(()).unwrap();

    assert!(
        first.join().unwrap(),
        "the second send could not finish while the first was blocked"
    );
}
