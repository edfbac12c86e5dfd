use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::net::Ipv4Addr;
use sxgeo::Database;

#[path = "../tests/common/mod.rs"]
mod common;

use common::{spread_ranges, DbBuilder};

fn random_ips(count: usize) -> Vec<Ipv4Addr> {
    let mut rng = StdRng::seed_from_u64(0x5347);
    (0..count)
        .map(|_| Ipv4Addr::from(rng.random_range((1u32 << 24)..(224u32 << 24))))
        .collect()
}

fn bench_lookup_by_size(c: &mut Criterion) {
    let ips = random_ips(1000);
    let mut group = c.benchmark_group("lookup_by_ranges");
    group.throughput(Throughput::Elements(ips.len() as u64));

    for ranges in [1_000u32, 50_000, 1_000_000] {
        let db = Database::from_bytes(
            DbBuilder::new()
                .ranges(spread_ranges(ranges))
                .bucket_rows(32)
                .build(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(ranges), &ips, |b, ips| {
            b.iter(|| {
                for ip in ips {
                    black_box(db.lookup_ip(*ip).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_main_index(c: &mut Criterion) {
    let ips = random_ips(1000);
    let mut group = c.benchmark_group("bucket_rows");
    group.throughput(Throughput::Elements(ips.len() as u64));

    // 0 disables the main index and leaves one binary search per window
    for bucket in [0u16, 8, 64, 512] {
        let db = Database::from_bytes(
            DbBuilder::new()
                .ranges(spread_ranges(500_000))
                .bucket_rows(bucket)
                .build(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(bucket), &ips, |b, ips| {
            b.iter(|| {
                for ip in ips {
                    black_box(db.lookup_ip(*ip).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_parse_and_lookup(c: &mut Criterion) {
    let db = Database::from_bytes(
        DbBuilder::new()
            .ranges(spread_ranges(100_000))
            .bucket_rows(32)
            .build(),
    )
    .unwrap();
    let queries: Vec<String> = random_ips(1000).iter().map(|ip| ip.to_string()).collect();

    c.benchmark_group("parse_and_lookup")
        .throughput(Throughput::Elements(queries.len() as u64))
        .bench_function("lookup_str", |b| {
            b.iter(|| {
                for q in &queries {
                    black_box(db.lookup(q).ok());
                }
            });
        });
}

criterion_group!(
    benches,
    bench_lookup_by_size,
    bench_main_index,
    bench_parse_and_lookup
);
criterion_main!(benches);
