mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shape_array::sampling::{
    PoissonDiskSampling, PoissonScatter, ScatterBound, ScatterSettings, UniformRandomSampling,
    VolumeSampling,
};

const COUNTS: [usize; 4] = [64, 256, 1024, 4096];

fn bounds() -> [(&'static str, ScatterBound); 3] {
    [
        (
            "box",
            ScatterBound::Box {
                size: Vec3::splat(100.0),
            },
        ),
        (
            "sphere",
            ScatterBound::Sphere {
                radius: 50.0,
                surface: false,
            },
        ),
        (
            "plane",
            ScatterBound::Plane {
                size: Vec2::splat(200.0),
            },
        ),
    ]
}

fn sampling_poisson_benches(c: &mut Criterion) {
    for (name, bound) in bounds() {
        let mut group = c.benchmark_group(format!("sampling/poisson_disk/{name}"));

        for &count in &COUNTS {
            group.throughput(common::elements_throughput(count));
            let strategy = PoissonDiskSampling::new(count, 1.0);
            let mut rng = StdRng::seed_from_u64(0xC0FFEE_u64 ^ count as u64);

            group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
                b.iter(|| {
                    let pts = strategy.generate(&bound, &mut rng);
                    black_box(pts.len());
                });
            });
        }

        group.finish();
    }
}

fn sampling_find_one_more_benches(c: &mut Criterion) {
    let bound = ScatterBound::Plane {
        size: Vec2::splat(200.0),
    };
    let mut group = c.benchmark_group("sampling/find_one_more");

    for &count in &COUNTS {
        let mut seed_rng = StdRng::seed_from_u64(0xBEEF_u64 ^ count as u64);
        let mut base = PoissonScatter::new(bound, ScatterSettings::new(1.0));
        base.generate(count, &mut seed_rng);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xF00D);
            b.iter(|| {
                let mut scatter = base.clone();
                black_box(scatter.find_one_more_point(&mut rng));
            });
        });
    }

    group.finish();
}

fn sampling_uniform_benches(c: &mut Criterion) {
    let bound = ScatterBound::Box {
        size: Vec3::splat(100.0),
    };
    let mut group = c.benchmark_group("sampling/uniform_random");

    for &count in &COUNTS {
        group.throughput(common::elements_throughput(count));
        let strategy = UniformRandomSampling::new(count);
        let mut rng = StdRng::seed_from_u64(0xA11CE_u64 ^ count as u64);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let pts = strategy.generate(&bound, &mut rng);
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_poisson_benches, sampling_find_one_more_benches, sampling_uniform_benches
}
criterion_main!(benches);
