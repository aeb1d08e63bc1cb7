use criterion::{black_box, criterion_group, criterion_main, Criterion};
use energy_dashboard::dashboard::seed::{downsample, moving_average, DatePreset, SeedData};

fn bench_series_data(c: &mut Criterion) {
    let seed = SeedData::bundled();
    let range = DatePreset::AllThreeDays.range();
    c.bench_function("series_data_3d_hourly", |b| {
        b.iter(|| seed.series_data(black_box(Some(range)), black_box(60)))
    });

    let raw = seed.series_data(None, 0);
    c.bench_function("downsample_2h", |b| {
        b.iter(|| downsample(black_box(raw.clone()), 120))
    });

    let day = seed.series_data(Some(DatePreset::LastDay.range()), 60);
    c.bench_function("moving_average_10", |b| {
        b.iter(|| moving_average(black_box(&day), 10))
    });
}

criterion_group!(benches, bench_series_data);
criterion_main!(benches);
