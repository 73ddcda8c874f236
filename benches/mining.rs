//! Benchmarks for grouping, encoding and mining
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tracker_rs::analysis::{FpMax, MinerOptions};
use tracker_rs::pipeline::stages::{encode, group, normalize};
use tracker_rs::types::{Group, RawObservation, RawTable};

/// Deterministic linear congruential generator so runs are comparable
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Recordings where a few mac "cliques" travel together plus random noise
fn synthetic_recordings(keys: usize, macs: u64) -> RawTable {
    let mut rng = Lcg(42);
    let cliques: [&[i64]; 3] = [&[1, 2, 3], &[10, 11], &[20, 21, 22, 23]];
    let mut rows = Vec::new();
    for k in 0..keys as i64 {
        let (day, hour, ip) = (k / (24 * 50), (k / 50) % 24, k % 50);
        let clique = cliques[rng.next() as usize % cliques.len()];
        for &mac in clique {
            rows.push(RawObservation::new(day % 31, hour, ip, mac));
        }
        for _ in 0..rng.next() % 4 {
            let mac = 100 + (rng.next() % macs) as i64;
            rows.push(RawObservation::new(day % 31, hour, ip, mac));
        }
    }
    RawTable::new(rows)
}

fn synthetic_groups(keys: usize, macs: u64) -> Vec<Group> {
    let table = normalize(&synthetic_recordings(keys, macs)).unwrap();
    group(&table)
}

fn bench_preprocessing(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("preprocessing");

    for keys in [1_000, 10_000].iter() {
        let raw = synthetic_recordings(*keys, 200);
        group_bench.throughput(Throughput::Elements(raw.len() as u64));
        group_bench.bench_with_input(BenchmarkId::new("normalize_group_encode", keys), &raw, |b, raw| {
            b.iter(|| {
                let table = normalize(black_box(raw)).unwrap();
                let groups = group(&table);
                encode(&groups).unwrap()
            });
        });
    }

    group_bench.finish();
}

fn bench_fpmax(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("fpmax");
    let miner = FpMax::new(MinerOptions::default());

    for keys in [1_000, 10_000].iter() {
        let matrix = encode(&synthetic_groups(*keys, 200)).unwrap();
        for min_support in [0.2, 0.05, 0.01].iter() {
            group_bench.bench_with_input(
                BenchmarkId::new(format!("keys_{}", keys), min_support),
                min_support,
                |b, &s| b.iter(|| miner.mine(black_box(&matrix), s).unwrap()),
            );
        }
    }

    group_bench.finish();
}

criterion_group!(benches, bench_preprocessing, bench_fpmax);
criterion_main!(benches);
