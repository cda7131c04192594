use concentration_core::{GridSize, ShuffledGridGenerator};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn deal_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");
    for size in GridSize::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(ShuffledGridGenerator::new(seed).deal(size))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, deal_presets);
criterion_main!(benches);
