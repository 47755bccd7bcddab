//! Throughput of burst generation and per-frame integration.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skyburst::{burst, integrator, BurstDesign, DisplayParams, SpawnContext, Vec3};

fn bench_generate(c: &mut Criterion) {
    let params = DisplayParams {
        particle_count: 1000,
        ..DisplayParams::default()
    };
    let mut ctx = SpawnContext::with_seed(1);

    c.bench_function("generate_explosion_1000", |b| {
        b.iter(|| burst::generate(black_box(Vec3::ZERO), &params, &mut ctx))
    });

    let spiral = DisplayParams {
        design: BurstDesign::Spiral,
        ..params
    };
    c.bench_function("generate_spiral_1000", |b| {
        b.iter(|| burst::generate(black_box(Vec3::ZERO), &spiral, &mut ctx))
    });
}

fn bench_step(c: &mut Criterion) {
    let params = DisplayParams::default();
    let mut ctx = SpawnContext::with_seed(2);
    let mut buffers = burst::generate(Vec3::ZERO, &params, &mut ctx);

    c.bench_function("step_500", |b| {
        b.iter(|| integrator::step(black_box(&mut buffers), 0.016))
    });
}

criterion_group!(benches, bench_generate, bench_step);
criterion_main!(benches);
