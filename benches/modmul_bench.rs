use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use primebench::fermat::{FermatTag, LimbFermat};
use primebench::limbs::{self, Modulus};
use primebench::mersenne::LimbMersenne;
use primebench::reducer::{FermatReducer, GmpFermat, GmpMersenne, MersenneReducer};

/// A dense K-bit operand: alternating bit pattern, top bits masked.
fn operand(modulus: &Modulus) -> Vec<u64> {
    let mut x = vec![0xa5a5_a5a5_5a5a_5a5a; modulus.limbs()];
    limbs::mask_top(&mut x, modulus.top_mask());
    x
}

fn bench_fermat_square(c: &mut Criterion) {
    let mut group = c.benchmark_group("fermat_square");
    for bits in [1024u64, 4096, 16384] {
        let modulus = Modulus::new(bits).unwrap();
        let x = operand(&modulus);
        let mut z = vec![0; modulus.limbs()];

        let mut fast = LimbFermat::new(modulus).unwrap();
        group.bench_with_input(BenchmarkId::new("limb", bits), &bits, |b, _| {
            b.iter(|| fast.mul_mod(&mut z, black_box(&x), FermatTag::Stored, &x, FermatTag::Stored));
        });
        let mut slow = GmpFermat::new(modulus).unwrap();
        group.bench_with_input(BenchmarkId::new("gmp", bits), &bits, |b, _| {
            b.iter(|| slow.mul_mod(&mut z, black_box(&x), FermatTag::Stored, &x, FermatTag::Stored));
        });
    }
    group.finish();
}

fn bench_mersenne_square(c: &mut Criterion) {
    let mut group = c.benchmark_group("mersenne_square");
    for bits in [1279u64, 4253, 11213] {
        let modulus = Modulus::new(bits).unwrap();
        let x = operand(&modulus);
        let mut z = vec![0; modulus.limbs()];

        let mut fast = LimbMersenne::new(modulus).unwrap();
        group.bench_with_input(BenchmarkId::new("limb", bits), &bits, |b, _| {
            b.iter(|| fast.mul_mod(&mut z, black_box(&x), &x));
        });
        let mut slow = GmpMersenne::new(modulus).unwrap();
        group.bench_with_input(BenchmarkId::new("gmp", bits), &bits, |b, _| {
            b.iter(|| slow.mul_mod(&mut z, black_box(&x), &x));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fermat_square, bench_mersenne_square);
criterion_main!(benches);
