use core::hint::black_box;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use socialid::{Allocator, IdentifierSpace, MemoryStore, PoolGenerator, WordLists};
use std::{sync::Barrier, thread::scope, time::Instant};

// Number of users assigned per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_USERS: usize = 4096;

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    PoolGenerator::new(&store, &WordLists::default())
        .regenerate_pool()
        .unwrap();
    store
}

fn bench_enumerate(c: &mut Criterion) {
    let space = IdentifierSpace::new(&WordLists::default());
    let mut group = c.benchmark_group("space");
    group.throughput(Throughput::Elements(space.len() as u64));
    group.bench_function("enumerate", |b| {
        b.iter(|| black_box(space.enumerate().unwrap()));
    });
    group.finish();
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory/assign");
    group.throughput(Throughput::Elements(TOTAL_USERS as u64));

    group.bench_function(format!("issued/elems/{TOTAL_USERS}"), |b| {
        b.iter_batched(
            seeded_store,
            |store| {
                let allocator = Allocator::new(&store);
                for i in 0..TOTAL_USERS {
                    black_box(allocator.assign(&i.to_string()).unwrap());
                }
            },
            BatchSize::LargeInput,
        );
    });

    let store = seeded_store();
    let allocator = Allocator::new(&store);
    for i in 0..TOTAL_USERS {
        allocator.assign(&i.to_string()).unwrap();
    }
    group.bench_function(format!("existing/elems/{TOTAL_USERS}"), |b| {
        b.iter(|| {
            for i in 0..TOTAL_USERS {
                black_box(allocator.assign(&i.to_string()).unwrap());
            }
        });
    });

    group.finish();
}

fn bench_assign_threaded(c: &mut Criterion) {
    let threads = [2, 4];
    let mut group = c.benchmark_group("memory/assign/threaded");

    for &thread_count in &threads {
        group.throughput(Throughput::Elements((thread_count * TOTAL_USERS) as u64));
        group.bench_function(format!("threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let mut total = core::time::Duration::ZERO;
                for _ in 0..iters {
                    let store = seeded_store();
                    let barrier = Barrier::new(thread_count + 1);
                    let start = scope(|s| {
                        for t in 0..thread_count {
                            let (store, barrier) = (&store, &barrier);
                            s.spawn(move || {
                                let allocator = Allocator::new(store);
                                barrier.wait();
                                for i in 0..TOTAL_USERS {
                                    black_box(allocator.assign(&format!("{t}-{i}")).unwrap());
                                }
                            });
                        }
                        barrier.wait();
                        Instant::now()
                    });
                    total += start.elapsed();
                }
                total
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_enumerate, bench_assign, bench_assign_threaded);
criterion_main!(benches);
