use cardinal_tree::{IntervalTree, OrderStatTree};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn random_spans(n: usize) -> Vec<(i64, i64)> {
    let mut spans = Vec::with_capacity(n);
    let mut x: u64 = 54321;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let low = ((x >> 33) % 1_000_000) as i64;
        let width = ((x >> 17) % 1_000) as i64;
        spans.push((low, low + width));
    }
    spans
}

// ─── Order-statistics benchmarks ────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("ost_insert");

    for (name, keys) in [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ] {
        group.bench_function(BenchmarkId::new("OrderStatTree", name), |b| {
            b.iter(|| {
                let mut tree = OrderStatTree::new();
                for &key in &keys {
                    tree.insert(key);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", name), |b| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &key in &keys {
                    set.insert(key);
                }
                set
            });
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("ost_remove");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("OrderStatTree", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<OrderStatTree<i64>>(),
            |mut tree| {
                for key in &keys {
                    tree.remove(key);
                }
                tree
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("ost_select");
    let keys = random_keys(N);
    let tree: OrderStatTree<i64> = keys.iter().copied().collect();
    let set: BTreeSet<i64> = keys.iter().copied().collect();
    let len = tree.len();

    // O(log n) selection against the O(n) iterator walk it replaces.
    group.bench_function(BenchmarkId::new("OrderStatTree", len), |b| {
        b.iter(|| {
            let mut sum = 0;
            for rank in (1..=len).step_by(97) {
                sum += *tree.select(rank).unwrap();
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet_nth", len), |b| {
        b.iter(|| {
            let mut sum = 0;
            for rank in (1..=len).step_by(97) {
                sum += *set.iter().nth(rank - 1).unwrap();
            }
            sum
        });
    });

    group.finish();
}

// ─── Interval benchmarks ────────────────────────────────────────────────────

fn bench_interval_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("interval_search");
    let spans = random_spans(N);
    let tree: IntervalTree<i64> = spans.iter().copied().collect();
    let queries = random_spans(1_000);

    group.bench_function(BenchmarkId::new("IntervalTree", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &(low, high) in &queries {
                if tree.interval_search(low, high).is_some() {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("Vec_scan", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &(qlow, qhigh) in &queries {
                if spans.iter().any(|&(low, high)| low <= qhigh && qlow <= high) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_remove, bench_select, bench_interval_search);
criterion_main!(benches);
