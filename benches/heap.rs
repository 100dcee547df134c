use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use indexed_pq::IndexedMinHeap;

const NUM_ELEMENTS: usize = 10_000;

fn random_values(seed: u64) -> Vec<u64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..NUM_ELEMENTS).map(|_| rng.u64(..1_000_000)).collect()
}

fn bench_push_pop(c: &mut Criterion) {
    let values = random_values(12345);

    c.bench_function("push_pop", |b| {
        b.iter(|| {
            let mut queue = IndexedMinHeap::with_capacity(values.len());
            for &value in &values {
                queue.push(black_box(value));
            }
            while let Ok(value) = queue.pop_min() {
                black_box(value);
            }
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let values = random_values(12345);

    c.bench_function("build_min_heap", |b| {
        b.iter_batched(
            || values.clone(),
            |values| black_box(IndexedMinHeap::from_values(values)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_decrease_key(c: &mut Criterion) {
    let values = random_values(12345);
    let mut rng = fastrand::Rng::with_seed(54321);

    c.bench_function("decrease_key", |b| {
        b.iter_batched(
            || {
                let mut queue = IndexedMinHeap::with_capacity(values.len());
                let handles: Vec<_> = values.iter().map(|&v| queue.push(v)).collect();
                (queue, handles)
            },
            |(mut queue, handles)| {
                for &handle in &handles {
                    let current = *queue.get(handle).unwrap();
                    let new = current.saturating_sub(rng.u64(..1_000));
                    queue.decrease_key(handle, black_box(new)).unwrap();
                }
                queue
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_drain_sorted(c: &mut Criterion) {
    let values = random_values(12345);

    c.bench_function("drain_sorted", |b| {
        b.iter_batched(
            || IndexedMinHeap::from_values(values.iter().copied()),
            |mut queue| black_box(queue.drain_sorted()),
            BatchSize::LargeInput,
        )
    });
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn benches(c: &mut Criterion) {
    init_logging();
    bench_push_pop(c);
    bench_build(c);
    bench_decrease_key(c);
    bench_drain_sorted(c);
}

criterion_group!(heap_benches, benches);
criterion_main!(heap_benches);
