//! Blend engine and dynamics benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use strokecore::blend::{blend_into, blend_parallel, BlendMode, Pixel, DEFAULT_CHUNK_LEN};
use strokecore::core::contracts::{DynamicsCoords, PaintBase};
use strokecore::dynamics::{
    DynamicAxis, DynamicTarget, DynamicsMixer, DynamicsOptions, SeededRandom,
};
use std::sync::Arc;

fn generate_region(len: usize, alpha: f32) -> Vec<Pixel> {
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            [t * alpha, (1.0 - t) * alpha, 0.5 * alpha, alpha]
        })
        .collect()
}

fn benchmark_blend_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blend Modes 64x64");

    let composite = generate_region(64 * 64, 0.8);
    let layer = generate_region(64 * 64, 0.5);
    let mut out = composite.clone();

    for mode in BlendMode::ALL.iter().filter(|m| m.is_point_wise()) {
        group.bench_with_input(BenchmarkId::new("blend", mode), mode, |b, &mode| {
            b.iter(|| blend_into(&composite, &layer, &mut out, mode))
        });
    }

    group.finish();
}

fn benchmark_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("Region 1024x1024");
    group.sample_size(20);

    let composite = generate_region(1024 * 1024, 1.0);
    let layer = generate_region(1024 * 1024, 0.6);
    let mut out = composite.clone();

    group.bench_function("serial", |b| {
        b.iter(|| blend_into(&composite, &layer, &mut out, BlendMode::SoftLight))
    });

    for chunk_len in [1024, DEFAULT_CHUNK_LEN, 64 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("parallel", chunk_len),
            &chunk_len,
            |b, &chunk_len| {
                b.iter(|| {
                    blend_parallel(&composite, &layer, &mut out, BlendMode::SoftLight, chunk_len)
                })
            },
        );
    }

    group.finish();
}

fn benchmark_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dynamics");

    let paint = PaintBase::default();
    let coords = DynamicsCoords {
        pressure: 0.6,
        velocity: 0.3,
        xtilt: 0.2,
        ytilt: -0.4,
        direction: 0.7,
    };

    let default_mixer = DynamicsMixer::new("bench");
    group.bench_function("evaluate_default", |b| {
        b.iter(|| default_mixer.evaluate(&paint, &coords, 42.0))
    });

    // Every axis on every target
    let mut options = DynamicsOptions::default();
    for axis in DynamicAxis::ALL {
        for target in DynamicTarget::ALL {
            options.axis_mut(axis).set_enabled(target, true);
        }
    }
    let full_mixer = DynamicsMixer::with_options("bench", options)
        .with_random(Arc::new(SeededRandom::new(7)));
    group.bench_function("evaluate_all_axes", |b| {
        b.iter(|| full_mixer.evaluate(&paint, &coords, 42.0))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_blend_modes,
    benchmark_region,
    benchmark_dynamics
);
criterion_main!(benches);
