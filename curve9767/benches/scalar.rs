use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use curve9767::Scalar;
use rand_core::{OsRng, TryRngCore};

pub fn scalar(c: &mut Criterion) {
    let mut rng = OsRng.unwrap_err();
    let mut group = c.benchmark_group("scalar");

    group.bench_function("mul", |b| {
        b.iter_batched(
            || (Scalar::random(&mut rng), Scalar::random(&mut rng)),
            |(a, b)| a * b,
            BatchSize::SmallInput,
        )
    });

    group.bench_function("add", |b| {
        b.iter_batched(
            || (Scalar::random(&mut rng), Scalar::random(&mut rng)),
            |(a, b)| a + b,
            BatchSize::SmallInput,
        )
    });

    group.bench_function("encode", |b| {
        b.iter_batched(
            || Scalar::random(&mut rng),
            |a| a.to_bytes(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("decode_reduce_64", |b| {
        b.iter_batched(
            || {
                let mut msg = [0u8; 64];
                OsRng.try_fill_bytes(&mut msg).unwrap();
                msg
            },
            |msg| Scalar::from_bytes_mod_order(&msg),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, scalar);
criterion_main!(benches);
