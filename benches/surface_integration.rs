//! Benchmarks for union-of-balls area and volume.
//!
//! Balls are placed on a jittered cubic lattice with a spacing close to
//! their diameter, so the union has the pair and triple overlaps typical of
//! a packed molecule.

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use alphasurf::prelude::*;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const SIDES: &[usize] = &[4, 7, 10];
const SPACING: f64 = 1.5;

fn lattice(side: usize) -> Vec<(Point, f64)> {
    let n = side * side * side;
    let jitter = random_points_seeded(n, (-0.2, 0.2), 0x5EED).unwrap();
    let mut balls = Vec::with_capacity(n);
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                let center = Point::new([i, j, k].map(|c| c as f64 * SPACING));
                let offset = jitter[balls.len()].to_vector();
                balls.push((center + offset, 1.0 + 0.1 * ((i + j + k) % 3) as f64));
            }
        }
    }
    balls
}

fn bench_surface(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface");
    group.sample_size(20);
    for &side in SIDES {
        let balls = lattice(side);
        group.throughput(Throughput::Elements(balls.len() as u64));

        group.bench_with_input(BenchmarkId::new("volume", balls.len()), &balls, |b, balls| {
            b.iter_batched(
                || SurfaceModel::new(balls.clone()).unwrap(),
                |surface| black_box(surface.volume().unwrap()),
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(
            BenchmarkId::new("solvent_accessible_area", balls.len()),
            &balls,
            |b, balls| {
                b.iter_batched(
                    || {
                        let mut surface = SurfaceModel::new(balls.clone()).unwrap();
                        surface.set_surface_type(SurfaceType::SolventAccessible);
                        surface
                    },
                    |surface| black_box(surface.surface_area().unwrap()),
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_surface);
criterion_main!(benches);
