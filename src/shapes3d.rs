//! Procedural solids.
//!
//! Every generator returns a unit-scale mesh centred at the origin, with
//! `y` as the axis of rotational solids. All vertices carry a copy of the
//! given phenotype and a zero normal; call [`Mesh::compute_normals`] before
//! lighting.
//!
//! Side counts are clamped to `[MIN_SIDES, MAX_SIDES]`.

use crate::basics::PI;
use crate::mat4::Mat4;
use crate::math::Vec4;
use crate::mesh::{Mesh, Tri};
use crate::phenotype::Phenotype;

pub const MIN_SIDES: usize = 3;
pub const MAX_SIDES: usize = 24;

fn clamp_sides(sides: usize) -> usize {
    sides.clamp(MIN_SIDES, MAX_SIDES)
}

/// Append a batch of local triangles, offsetting their indices by `base`.
fn push_tris(tris: &mut Vec<Tri>, base: usize, local: &[Tri]) {
    tris.extend(local.iter().map(|t| t.map(|i| i + base)));
}

fn assemble(verts: Vec<Vec4>, tris: Vec<Tri>, pheno: &Phenotype) -> Mesh {
    Mesh {
        normals: vec![Vec4::zero(); verts.len()],
        phenos: vec![*pheno; verts.len()],
        verts,
        tris,
    }
}

/// Angle of the `n`-th of `sides` equal segments of a full turn.
#[inline]
fn segment_angle(n: usize, sides: usize) -> f64 {
    n as f64 * 2.0 * PI / sides as f64
}

// ============================================================================
// Cube
// ============================================================================

/// Round every coordinate to a multiple of 0.5, removing the rounding noise
/// of quarter-turn rotations. Edge-on faces must stay exactly degenerate.
fn snap_half(v: Vec4) -> Vec4 {
    let snap = |c: f64| (c * 2.0).round() / 2.0;
    Vec4::new(snap(v.x), snap(v.y), snap(v.z))
}

/// Cube with side length 1: 6 faces of 4 vertices and 2 triangles each.
pub fn create_cube(pheno: &Phenotype) -> Mesh {
    const FACE: [Vec4; 4] = [
        Vec4::new(0.5, 0.5, 0.5),
        Vec4::new(-0.5, 0.5, 0.5),
        Vec4::new(-0.5, -0.5, 0.5),
        Vec4::new(0.5, -0.5, 0.5),
    ];

    let mut verts = Vec::with_capacity(24);
    let mut tris = Vec::with_capacity(12);
    for i in 0..6 {
        let tr = match i {
            0..=3 => Mat4::rotation_x(i as f64 * PI / 2.0),
            4 => Mat4::rotation_y(-PI / 2.0),
            _ => Mat4::rotation_y(PI / 2.0),
        };
        push_tris(&mut tris, verts.len(), &[[0, 1, 2], [0, 2, 3]]);
        verts.extend(FACE.iter().map(|&v| snap_half(tr.transform(v))));
    }
    assemble(verts, tris, pheno)
}

// ============================================================================
// Prism
// ============================================================================

/// Prism with outer diameter 1 and height 1.
///
/// `rtop` scales the top outline relative to the bottom; `0` collapses it
/// to a pyramid, in which case no top face is generated. Negative values
/// count as 0.
pub fn create_prism(pheno: &Phenotype, sides: usize, rtop: f64) -> Mesh {
    let sides = clamp_sides(sides);
    let rtop = rtop.max(0.0);

    let mut verts = Vec::new();
    let mut tris = Vec::new();
    for n in 0..sides {
        let (s0, c0) = segment_angle(n, sides).sin_cos();
        let (s1, c1) = segment_angle(n + 1, sides).sin_cos();
        let (x0, z0) = (c1 * 0.5, s1 * 0.5);
        let (x1, z1) = (c0 * 0.5, s0 * 0.5);
        let (x2, z2) = (c0 * 0.5 * rtop, s0 * 0.5 * rtop);
        let (x3, z3) = (c1 * 0.5 * rtop, s1 * 0.5 * rtop);

        let base = verts.len();
        verts.extend([
            // mantle
            Vec4::new(x0, -0.5, z0),
            Vec4::new(x1, -0.5, z1),
            Vec4::new(x2, 0.5, z2),
            // bottom
            Vec4::new(0.0, -0.5, 0.0),
            Vec4::new(x0, -0.5, z0),
            Vec4::new(x1, -0.5, z1),
        ]);
        push_tris(&mut tris, base, &[[0, 1, 2], [3, 4, 5]]);

        if rtop > 0.0 {
            verts.extend([
                Vec4::new(x3, 0.5, z3),
                // top
                Vec4::new(0.0, 0.5, 0.0),
                Vec4::new(x2, 0.5, z2),
                Vec4::new(x3, 0.5, z3),
            ]);
            push_tris(&mut tris, base, &[[0, 2, 6], [7, 9, 8]]);
        }
    }
    assemble(verts, tris, pheno)
}

// ============================================================================
// Cylinder
// ============================================================================

/// Cylinder with diameter 1 and height 1.
///
/// Unlike the prism, mantle vertices are shared between neighboring
/// segments so the mantle lights smoothly, and the caps share one centre
/// vertex each. `rtop` behaves as in [`create_prism`], giving a cone at 0.
pub fn create_cylinder(pheno: &Phenotype, sides: usize, rtop: f64) -> Mesh {
    let sides = clamp_sides(sides);
    let rtop = rtop.max(0.0);
    let has_top = rtop > 0.0;

    let mut verts = vec![Vec4::new(0.0, -0.5, 0.0)];
    if has_top {
        verts.push(Vec4::new(0.0, 0.5, 0.0));
    }
    let first = verts.len();
    let per_slice = if has_top { 4 } else { 3 };

    let mut tris = Vec::new();
    for n in 0..sides {
        let (s, c) = segment_angle(n, sides).sin_cos();
        let bottom = Vec4::new(c * 0.5, -0.5, s * 0.5);
        let top = Vec4::new(c * 0.5 * rtop, 0.5, s * 0.5 * rtop);

        let in0 = first + n * per_slice;
        let in1 = first + ((n + 1) % sides) * per_slice;

        // mantle bottom, mantle top, bottom cap
        verts.extend([bottom, top, bottom]);
        tris.push([in0, in0 + 1, in1]);
        tris.push([0, in0 + 2, in1 + 2]);
        if has_top {
            // top cap
            verts.push(top);
            tris.push([in0 + 1, in1 + 1, in1]);
            tris.push([1, in1 + 3, in0 + 3]);
        }
    }
    assemble(verts, tris, pheno)
}

// ============================================================================
// Sphere
// ============================================================================

/// Sphere with diameter 1.
///
/// Built from `sides` meridian slices, each split into `max(sides / 2, 3)`
/// bands. The two poles are shared vertices.
pub fn create_sphere(pheno: &Phenotype, sides: usize) -> Mesh {
    let sides = clamp_sides(sides);
    let discs = (sides / 2).max(3);
    // vertices per meridian, poles excluded
    let per_slice = discs - 1;
    let first = 2;

    let mut verts = vec![Vec4::new(0.0, 0.5, 0.0), Vec4::new(0.0, -0.5, 0.0)];
    let mut tris = Vec::new();
    for n in 0..sides {
        let tr = Mat4::rotation_y(-segment_angle(n, sides));
        let in0 = first + n * per_slice;
        let in1 = first + ((n + 1) % sides) * per_slice;

        for m in 1..discs {
            let b = PI / 2.0 - m as f64 * PI / discs as f64;
            let (s, c) = b.sin_cos();
            verts.push(tr.transform(Vec4::new(c * 0.5, s * 0.5, 0.0)));
            if m < discs - 1 {
                tris.push([in0 + m - 1, in1 + m - 1, in0 + m]);
                tris.push([in0 + m, in1 + m - 1, in1 + m]);
            }
        }
        tris.push([0, in1, in0]);
        tris.push([1, in0 + discs - 2, in1 + discs - 2]);
    }
    assemble(verts, tris, pheno)
}

// ============================================================================
// Torus
// ============================================================================

/// Torus with big diameter 1, lying in the `xz` plane.
///
/// `ratio` is the tube diameter relative to the big diameter. `sides` is
/// used both for the tube cross-section and the segments around the ring.
pub fn create_torus(pheno: &Phenotype, sides: usize, ratio: f64) -> Mesh {
    let sides = clamp_sides(sides);

    let mut verts = Vec::with_capacity(sides * sides);
    let mut tris = Vec::with_capacity(2 * sides * sides);
    for n in 0..sides {
        let mut tr = Mat4::translation(0.5, 0.0, 0.0);
        tr.rotate_y(-segment_angle(n, sides));
        let in0 = n * sides;
        let in1 = ((n + 1) % sides) * sides;

        for m in 0..sides {
            let (s, c) = segment_angle(m, sides).sin_cos();
            verts.push(tr.transform(Vec4::new(c * 0.5 * ratio, s * 0.5 * ratio, 0.0)));
            let m1 = (m + 1) % sides;
            tris.push([in0 + m, in0 + m1, in1 + m]);
            tris.push([in0 + m1, in1 + m1, in1 + m]);
        }
    }
    assemble(verts, tris, pheno)
}

// ============================================================================
// Tests
// ============================================================================
