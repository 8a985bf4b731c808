use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use qvv_bound::sampling::{evaluate_sample_set, fibonacci_sphere};
use qvv_bound::{
    analytic_bound, compose_delta, conservative_bound, planar_pair_max, scaled_circle_max,
    Transform,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_pair_with_seed(scale: [f64; 3], seed: u64) -> (Transform, Transform) {
    let mut rng = StdRng::seed_from_u64(seed);
    let transform = |rng: &mut StdRng| {
        Transform::from_axis_angle_deg(
            rng.random_range(-180.0..180.0),
            rng.random_range(-90.0..90.0),
            rng.random_range(-180.0..180.0),
            [
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            ],
            scale,
        )
    };
    let raw = transform(&mut rng);
    let lossy = transform(&mut rng);
    (raw, lossy)
}

fn bench_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("bound_solvers");

    let (raw, lossy) = random_pair_with_seed([1.0; 3], 42);
    let delta = compose_delta(&raw, &lossy).unwrap();
    group.bench_function("analytic_bound", |b| {
        b.iter(|| std::hint::black_box(analytic_bound(std::hint::black_box(&delta))))
    });

    let (raw, lossy) = random_pair_with_seed([1.0, 2.0, 0.5], 42);
    group.bench_function("conservative_bound", |b| {
        b.iter(|| std::hint::black_box(conservative_bound(&raw, &lossy)))
    });

    group.bench_function("scaled_circle_max", |b| {
        b.iter(|| {
            std::hint::black_box(scaled_circle_max(
                std::hint::black_box(-std::f64::consts::FRAC_PI_2),
                3.0,
                1.0,
            ))
        })
    });

    let raw = Transform::planar(20.0, [0.0, 0.0], [1.0, 1.0]);
    let lossy = Transform::planar(128.6, [2.0, 5.0], [1.5, 0.75]);
    group.bench_function("planar_pair_max", |b| {
        b.iter(|| std::hint::black_box(planar_pair_max(&raw, &lossy)))
    });

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_sample_set");
    let (raw, lossy) = random_pair_with_seed([1.0, 2.0, 0.5], 7);
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = fibonacci_sphere(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let errors = evaluate_sample_set(&points, &raw, &lossy);
                std::hint::black_box(errors);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers, bench_sampling);
criterion_main!(benches);
