use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use nonzero_ext::*;
use ratepace::{clock, Bandwidth, RateLimiter};
use std::io;

pub fn bench_all(c: &mut Criterion) {
    bench_send(c);
    bench_receive(c);
    bench_unlimited(c);
}

fn bench_send(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded/send");
    for chunk in [nonzero!(64usize), nonzero!(1024usize), nonzero!(10_000usize)] {
        let buf = vec![0u8; 16 * 1024];
        group.throughput(Throughput::Bytes(buf.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            let clock = clock::FakeRelativeClock::default();
            let lim = RateLimiter::with_clock(Bandwidth::kbps(8_000).allow_chunk(chunk), &clock);
            b.iter(|| black_box(lim.send(&mut io::sink(), &buf).is_ok()));
        });
    }
    group.finish();
}

fn bench_receive(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    group.throughput(Throughput::Bytes(1024));
    group.bench_function("receive", |b| {
        let clock = clock::FakeRelativeClock::default();
        let lim = RateLimiter::with_clock(
            Bandwidth::kbps(8_000).allow_chunk(nonzero!(1024usize)),
            &clock,
        );
        let mut buf = [0u8; 1024];
        b.iter(|| black_box(lim.receive(&mut io::repeat(0), &mut buf).is_ok()));
    });
    group.finish();
}

fn bench_unlimited(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_threaded");
    group.throughput(Throughput::Bytes(16 * 1024));
    group.bench_function("unlimited", |b| {
        let lim = RateLimiter::unlimited();
        let buf = vec![0u8; 16 * 1024];
        b.iter(|| black_box(lim.send(&mut io::sink(), &buf).is_ok()));
    });
    group.finish();
}
