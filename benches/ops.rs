//! Micro-operation benchmarks for the heap map.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures per-operation latency (nanoseconds) for the core operations
//! against a prefilled map.

use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use heapkit::HeapMap;

const SIZE: usize = 16_384;
const OPS: u64 = 100_000;

fn prefilled() -> HeapMap<u64, u64> {
    // Scrambled priorities so the tree shape is not degenerate.
    (0..SIZE as u64).map(|i| (i, i.wrapping_mul(2654435761) % 1_000_000)).collect()
}

// ============================================================================
// Read Latency (ns/op)
// ============================================================================

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("get_hit", |b| {
        b.iter_custom(|iters| {
            let map = prefilled();
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    black_box(map.get(&(i % SIZE as u64)));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("peek_both_ends", |b| {
        b.iter_custom(|iters| {
            let map = prefilled();
            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..OPS {
                    black_box(map.peek_min());
                    black_box(map.peek_max());
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Mutation Latency (ns/op)
// ============================================================================

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("insert_new", |b| {
        b.iter_custom(|iters| {
            let mut elapsed = std::time::Duration::ZERO;
            for _ in 0..iters {
                let mut map = HeapMap::with_capacity(OPS as usize);
                let start = Instant::now();
                for i in 0..OPS {
                    map.insert(i, i.wrapping_mul(2654435761));
                }
                elapsed += start.elapsed();
                black_box(&map);
            }
            elapsed
        })
    });

    group.bench_function("set_priority_existing", |b| {
        b.iter_custom(|iters| {
            let mut map = prefilled();
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let key = i % SIZE as u64;
                    map.set_priority(&key, i.wrapping_mul(40503) % 1_000_000)
                        .unwrap();
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("pop_min_reinsert", |b| {
        b.iter_custom(|iters| {
            let mut map = prefilled();
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let (key, priority) = map.pop_min().unwrap();
                    map.insert(key, priority.wrapping_add(i));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("pop_max_reinsert", |b| {
        b.iter_custom(|iters| {
            let mut map = prefilled();
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let (key, priority) = map.pop_max().unwrap();
                    map.insert(key, priority.wrapping_sub(i));
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_reads, bench_mutations);
criterion_main!(benches);
