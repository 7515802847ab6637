use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use primebench::{GmpBackend, LimbBackend};

fn bench_pepin(c: &mut Criterion) {
    let mut group = c.benchmark_group("pepin");
    for k in [8u64, 10, 12] {
        group.bench_with_input(BenchmarkId::new("limb", k), &k, |b, &k| {
            b.iter(|| primebench::pepin_test::<LimbBackend>(black_box(k)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("gmp", k), &k, |b, &k| {
            b.iter(|| primebench::pepin_test::<GmpBackend>(black_box(k)).unwrap());
        });
    }
    group.finish();
}

fn bench_lucas_lehmer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lucas_lehmer");
    // M521 and M2203 are prime, so the full chain always runs.
    for k in [521u64, 2203] {
        group.bench_with_input(BenchmarkId::new("limb", k), &k, |b, &k| {
            b.iter(|| primebench::lucas_lehmer_test::<LimbBackend>(black_box(k)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("gmp", k), &k, |b, &k| {
            b.iter(|| primebench::lucas_lehmer_test::<GmpBackend>(black_box(k)).unwrap());
        });
    }
    group.finish();
}

fn bench_wagstaff(c: &mut Criterion) {
    c.bench_function("wagstaff_test(W701)", |b| {
        b.iter(|| primebench::wagstaff_test::<LimbBackend>(black_box(701)).unwrap());
    });
}

criterion_group!(benches, bench_pepin, bench_lucas_lehmer, bench_wagstaff);
criterion_main!(benches);
