use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rainday::{aggregate, compare, GroupSamples, HourlyObservation};

fn labels(n: usize, every: usize) -> Vec<bool> {
    (0..n).map(|i| i % every == 0).collect()
}

fn ten_years_hourly() -> Vec<HourlyObservation> {
    let start = NaiveDate::from_ymd_opt(2010, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..10 * 365 * 24)
        .map(|h| {
            let mm = if h % 29 < 3 { 0.4 } else { 0.0 };
            HourlyObservation::new(start + Duration::hours(h), mm)
        })
        .collect()
}

fn bench_rainday(c: &mut Criterion) {
    let weekday = labels(2600, 3);
    let weekend = labels(1040, 2);
    c.bench_function("compare_10k_iterations", |b| {
        b.iter(|| compare(black_box(&weekday), black_box(&weekend), 10_000, Some(1)))
    });

    let hourly = ten_years_hourly();
    c.bench_function("aggregate_ten_years", |b| {
        b.iter(|| {
            let days = aggregate(black_box(&hourly), 0.1, 1, None).unwrap();
            GroupSamples::partition(&days)
        })
    });
}

criterion_group!(benches, bench_rainday);
criterion_main!(benches);
