// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use partdiff::geometry::{compute_statistics, normalize};
use partdiff::io::{parse, MeshFormat};
use partdiff::{EngineConfig, PartSlot, Workbench};

/// Binary STL of a `n` x `n` grid of quads in the XY plane
fn grid_stl(n: usize) -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data.extend_from_slice(&((n * n * 2) as u32).to_le_bytes());
    for i in 0..n {
        for j in 0..n {
            let (x0, y0, x1, y1) = (i as f32, j as f32, i as f32 + 1.0, j as f32 + 1.0);
            for triangle in [
                [[x0, y0, 0.0], [x1, y0, 0.0], [x1, y1, 0.0]],
                [[x0, y0, 0.0], [x1, y1, 0.0], [x0, y1, 0.0]],
            ] {
                data.extend_from_slice(&[0u8; 12]);
                for vertex in triangle {
                    for coordinate in vertex {
                        data.extend_from_slice(&coordinate.to_le_bytes());
                    }
                }
                data.extend_from_slice(&[0u8; 2]);
            }
        }
    }
    data
}

/// OBJ of the same grid, sharing vertices between quads
fn grid_obj(n: usize) -> Vec<u8> {
    let mut source = String::new();
    for i in 0..=n {
        for j in 0..=n {
            source.push_str(&format!("v {} {} 0\n", i, j));
        }
    }
    let index = |i: usize, j: usize| i * (n + 1) + j + 1;
    for i in 0..n {
        for j in 0..n {
            source.push_str(&format!(
                "f {} {} {} {}\n",
                index(i, j),
                index(i + 1, j),
                index(i + 1, j + 1),
                index(i, j + 1)
            ));
        }
    }
    source.into_bytes()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for n in [16, 64] {
        let stl = grid_stl(n);
        group.bench_with_input(BenchmarkId::new("binary_stl", n), &stl, |b, bytes| {
            b.iter(|| parse(black_box(bytes), MeshFormat::Stl).unwrap());
        });

        let obj = grid_obj(n);
        group.bench_with_input(BenchmarkId::new("obj", n), &obj, |b, bytes| {
            b.iter(|| parse(black_box(bytes), MeshFormat::Obj).unwrap());
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let model = parse(&grid_stl(64), MeshFormat::Stl).unwrap();

    c.bench_function("normalize_and_statistics", |b| {
        b.iter(|| {
            let normalized = normalize(black_box(&model.root)).unwrap();
            compute_statistics(&normalized.mesh, &normalized.bounds)
        });
    });
}

fn bench_comparison(c: &mut Criterion) {
    let bench = Workbench::new(EngineConfig::default());
    bench
        .load_part(PartSlot::Original, &grid_stl(16), MeshFormat::Stl)
        .unwrap();
    bench
        .load_part(PartSlot::Modified, &grid_stl(32), MeshFormat::Stl)
        .unwrap();

    c.bench_function("get_comparison", |b| {
        b.iter(|| black_box(bench.get_comparison()).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_statistics, bench_comparison);
criterion_main!(benches);
