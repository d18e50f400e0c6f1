#![cfg(target_os = "linux")]

// Reads the peak resident set size through getrusage, so this only runs
// on Linux.
extern crate libc;

use nonzero_ext::*;
use ratepace::clock::FakeRelativeClock;
use ratepace::{Bandwidth, RateLimiter};
use std::io;
use std::sync::Arc;
use std::thread;

fn resident_memory_size() -> i64 {
    let mut out: libc::rusage = unsafe { std::mem::zeroed() };
    assert!(unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut out) } == 0);
    out.ru_maxrss
}

const LEAK_TOLERANCE: i64 = 1024 * 1024 * 10;

struct LeakCheck {
    usage_before: i64,
    n_iter: usize,
}

impl Drop for LeakCheck {
    fn drop(&mut self) {
        let usage_after = resident_memory_size();
        assert!(
            usage_after <= self.usage_before + LEAK_TOLERANCE,
            "Plausible memory leak!\nAfter {} iterations, usage before: {}, usage after: {}",
            self.n_iter,
            self.usage_before,
            usage_after
        );
    }
}

impl LeakCheck {
    fn new(n_iter: usize) -> Self {
        LeakCheck {
            n_iter,
            usage_before: resident_memory_size(),
        }
    }
}

fn fast_limiter(clock: &FakeRelativeClock) -> RateLimiter<FakeRelativeClock> {
    RateLimiter::with_clock(
        Bandwidth::kbps(1_000_000).allow_chunk(nonzero!(64usize)),
        clock,
    )
}

#[test]
fn memleak_send() {
    let clock = FakeRelativeClock::default();
    let lim = fast_limiter(&clock);
    let leak_check = LeakCheck::new(200_000);

    for _i in 0..leak_check.n_iter {
        drop(lim.send(&mut io::sink(), &[0u8; 256]));
    }
}

#[test]
fn memleak_receive() {
    let clock = FakeRelativeClock::default();
    let lim = fast_limiter(&clock);
    let leak_check = LeakCheck::new(200_000);
    let mut buf = [0u8; 64];

    for _i in 0..leak_check.n_iter {
        drop(lim.receive(&mut io::repeat(1), &mut buf));
    }
}

#[test]
fn memleak_send_file() {
    let clock = FakeRelativeClock::default();
    let lim = fast_limiter(&clock);
    let leak_check = LeakCheck::new(50_000);

    for _i in 0..leak_check.n_iter {
        drop(lim.send_file(&mut io::sink(), &mut io::repeat(2), 2048));
    }
}

#[test]
fn memleak_send_threaded() {
    let clock = FakeRelativeClock::default();
    let lim = Arc::new(fast_limiter(&clock));
    let leak_check = LeakCheck::new(5_000);

    for _i in 0..leak_check.n_iter {
        let lim = lim.clone();
        thread::spawn(move || {
            assert_eq!(lim.send(&mut io::sink(), &[0u8; 128]).unwrap(), 128);
        })
        .join()
        .unwrap();
    }
}
