#![cfg(unix)]

use all_asserts::*;
use nonzero_ext::nonzero;
use ratepace::{Bandwidth, FlaggedSocket, RateLimiter};
use std::io::{self, Read};
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

#[test]
fn paced_send_through_flags() {
    let (a, mut b) = UnixStream::pair().unwrap();
    let lim = RateLimiter::new(Bandwidth::kbps(80).allow_chunk(nonzero!(500usize)));
    let mut sock = FlaggedSocket::new(&a).send_flags(libc::MSG_DONTWAIT);
    let i = Instant::now();

    assert_eq!(lim.send(&mut sock, &[5u8; 1500]).unwrap(), 1500);
    assert_ge!(i.elapsed(), Duration::from_millis(140));

    let mut got = vec![0u8; 1500];
    b.read_exact(&mut got).unwrap();
    assert_eq!(got, vec![5u8; 1500]);
}

#[test]
fn peek_leaves_data_queued() {
    let (a, b) = UnixStream::pair().unwrap();
    let lim = RateLimiter::new(Bandwidth::kbps(8000));
    lim.send(&mut FlaggedSocket::new(&a), b"hello").unwrap();

    let mut buf = [0u8; 16];
    let mut peeking = FlaggedSocket::new(&b).recv_flags(libc::MSG_PEEK);
    assert_eq!(lim.receive(&mut peeking, &mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");

    let mut buf = [0u8; 16];
    let mut plain = FlaggedSocket::new(&b);
    assert_eq!(lim.receive(&mut plain, &mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"hello");
}

#[test]
fn would_block_is_passed_through() {
    let (_a, b) = UnixStream::pair().unwrap();
    let lim = RateLimiter::new(Bandwidth::kbps(8000));
    let mut sock = FlaggedSocket::new(&b).recv_flags(libc::MSG_DONTWAIT);
    let mut buf = [0u8; 16];

    let err = lim.receive(&mut sock, &mut buf).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

#[test]
fn closed_peer_reads_as_end_of_stream() {
    let (a, b) = UnixStream::pair().unwrap();
    drop(a);
    let lim = RateLimiter::new(Bandwidth::kbps(8000));
    let mut buf = [0u8; 16];

    assert_eq!(lim.receive(&mut FlaggedSocket::new(&b), &mut buf).unwrap(), 0);
}
