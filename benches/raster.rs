//! Rasterization benchmarks: figure fills, mesh drawing and downsampling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use phenoraster::basics::FillingRule;
use phenoraster::buffer::Buffer;
use phenoraster::mat4::Mat4;
use phenoraster::notes::{render_notes, DEFAULT_PIXEL_WIDTH};
use phenoraster::phenotype::Phenotype;
use phenoraster::rasterizer::{draw_figure, draw_mesh};
use phenoraster::shapes3d::create_sphere;
use phenoraster::svg_path::parse_figure_from_svg_path;

const STAR: &str = "M32 2 L50 60 L2 24 H62 L14 60 Z";
const RINGS: &str = "M32 4 A28 28 0 1 1 31.9 4 Z M32 16 A16 16 0 1 0 32.1 16 Z";

// ============================================================================
// Figures
// ============================================================================

fn bench_figures(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_figure");
    let fill = Phenotype::default();

    for (name, d) in [("star", STAR), ("rings", RINGS)] {
        let figure = parse_figure_from_svg_path(d);
        for shift in [0u32, 2] {
            group.bench_with_input(BenchmarkId::new(name, shift), &shift, |bencher, &shift| {
                let mut buffer = Buffer::new(64, 64, shift).unwrap();
                bencher.iter(|| {
                    buffer.clear();
                    draw_figure(&mut buffer, black_box(&figure), &fill, FillingRule::NonZero);
                })
            });
        }
    }

    group.bench_function("parse_rings", |bencher| {
        bencher.iter(|| black_box(parse_figure_from_svg_path(black_box(RINGS))))
    });

    group.finish();
}

// ============================================================================
// Meshes
// ============================================================================

fn bench_meshes(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_mesh");

    let mut mesh = create_sphere(&Phenotype::default(), 24);
    let mut tr = Mat4::identity();
    tr.scale(56.0, 56.0, 56.0)
        .rotate_x(0.3)
        .translate(32.0, 32.0, 0.0);
    mesh.transform(&tr);
    mesh.compute_normals();

    for shift in [0u32, 2] {
        group.bench_with_input(BenchmarkId::new("sphere", shift), &shift, |bencher, &shift| {
            let mut buffer = Buffer::new(64, 64, shift).unwrap().with_depth();
            bencher.iter(|| {
                buffer.clear();
                draw_mesh(&mut buffer, black_box(&mesh));
            })
        });
    }

    group.finish();
}

// ============================================================================
// Downsampling
// ============================================================================

fn bench_render_notes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_notes");
    let figure = parse_figure_from_svg_path(RINGS);

    for shift in [0u32, 2, 4] {
        let mut buffer = Buffer::new(64, 64, shift).unwrap();
        draw_figure(&mut buffer, &figure, &Phenotype::default(), FillingRule::EvenOdd);
        group.bench_with_input(BenchmarkId::new("rings", shift), &buffer, |bencher, buffer| {
            bencher.iter(|| black_box(render_notes(buffer, 0, 0, DEFAULT_PIXEL_WIDTH)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_figures, bench_meshes, bench_render_notes);
criterion_main!(benches);
