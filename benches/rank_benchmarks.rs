use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rank_tree::{RankMap, RankSet};
use std::collections::{BTreeMap, BTreeSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ──────────────────────────────

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Set Benchmarks ──────────────────────────────────────────────────────────

fn bench_set_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert_ordered");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut set = RankSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_set_insert_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert_reverse");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut set = RankSet::new();
            for i in (0..N as i64).rev() {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in (0..N as i64).rev() {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_set_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_insert_random");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut set = RankSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_set_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rank_set: RankSet<i64> = keys.iter().cloned().collect();
    let bt_set: BTreeSet<i64> = keys.iter().cloned().collect();

    let mut group = c.benchmark_group("set_contains_random");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if rank_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if bt_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

// ─── Order-statistic benchmarks ──────────────────────────────────────────────

fn bench_set_get_by_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let rank_set: RankSet<i64> = keys.iter().cloned().collect();
    let bt_set: BTreeSet<i64> = keys.iter().cloned().collect();
    let len = rank_set.len();

    let mut group = c.benchmark_group("set_get_by_rank");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for rank in (0..len).step_by(7) {
                sum = sum.wrapping_add(*rank_set.get_by_rank(rank).unwrap());
            }
            sum
        });
    });

    // BTreeSet has no select; nth() is its O(rank) stand-in.
    group.bench_function(BenchmarkId::new("BTreeSet_nth", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for rank in (0..len).step_by(7) {
                sum = sum.wrapping_add(*bt_set.iter().nth(rank).unwrap());
            }
            sum
        });
    });

    group.finish();
}

fn bench_set_rank_of(c: &mut Criterion) {
    let keys = random_keys(N);
    let rank_set: RankSet<i64> = keys.iter().cloned().collect();
    let bt_set: BTreeSet<i64> = keys.iter().cloned().collect();

    let mut group = c.benchmark_group("set_rank_of");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for k in &keys {
                if let Some(rank) = rank_set.rank_of(k) {
                    sum = sum.wrapping_add(rank);
                }
            }
            sum
        });
    });

    // BTreeSet computes a rank by counting the range below the key.
    group.bench_function(BenchmarkId::new("BTreeSet_range_count", N), |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for k in &keys {
                if bt_set.contains(k) {
                    sum = sum.wrapping_add(bt_set.range(..*k).count());
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_set_remove_by_rank_drain(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("set_remove_by_rank_drain");

    group.bench_function(BenchmarkId::new("RankSet", N), |b| {
        b.iter_batched(
            || keys.iter().cloned().collect::<RankSet<i64>>(),
            |mut set| {
                let mut x: u64 = 98765;
                while !set.is_empty() {
                    x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let rank = ((x >> 33) as usize) % set.len();
                    set.remove_by_rank(rank).unwrap();
                }
                set
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Value-semantics benchmarks ──────────────────────────────────────────────

fn bench_set_clone_and_first_mutation(c: &mut Criterion) {
    let keys = random_keys(N);
    let rank_set: RankSet<i64> = keys.iter().cloned().collect();
    let bt_set: BTreeSet<i64> = keys.iter().cloned().collect();

    let mut group = c.benchmark_group("set_clone");

    // RankSet clone is a reference-count bump; BTreeSet clones eagerly.
    group.bench_function(BenchmarkId::new("RankSet_shared", N), |b| {
        b.iter(|| rank_set.clone());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| bt_set.clone());
    });

    // The deferred cost lands on the first mutation of a shared copy.
    group.bench_function(BenchmarkId::new("RankSet_first_mutation", N), |b| {
        b.iter_batched(
            || rank_set.clone(),
            |mut copy| {
                copy.insert(-1);
                copy
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Map Benchmarks ──────────────────────────────────────────────────────────

fn bench_map_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_insert_random");

    group.bench_function(BenchmarkId::new("RankMap", N), |b| {
        b.iter(|| {
            let mut map = RankMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rank_map: RankMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("RankMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = rank_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = bt_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_from_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let pairs: Vec<(i64, i64)> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_from_iter");

    group.bench_function(BenchmarkId::new("RankMap", N), |b| {
        b.iter(|| pairs.iter().cloned().collect::<RankMap<i64, i64>>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| pairs.iter().cloned().collect::<BTreeMap<i64, i64>>());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set_insert_ordered,
    bench_set_insert_reverse,
    bench_set_insert_random,
    bench_set_contains_random,
    bench_set_get_by_rank,
    bench_set_rank_of,
    bench_set_remove_by_rank_drain,
    bench_set_clone_and_first_mutation,
    bench_map_insert_random,
    bench_map_get_random,
    bench_map_from_iter,
);
criterion_main!(benches);
