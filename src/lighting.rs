//! Per-vertex diffuse lighting of meshes.
//!
//! Lighting blends each vertex's material phenotype toward a light
//! phenotype, based on how directly the vertex normal faces the light.
//! Vertices facing away are shaded instead: their velocity drops toward
//! zero.

use crate::math::Vec4;
use crate::mesh::Mesh;
use crate::phenotype::{interpolate_phenotypes, Phenotype};

/// Remap a lighting amount in `[-1, 1]` through an exponential response.
///
/// `shininess` sharpens the lit region: small amounts are pushed toward 0
/// while `±1` stays fixed. The sign of `amt` is preserved. A non-positive
/// shininess leaves `amt` unchanged.
pub fn shininess_curve(amt: f64, shininess: f64) -> f64 {
    if shininess <= 0.0 {
        return amt;
    }
    let k = 10.0 * shininess;
    amt.signum() * ((k * amt.abs()).exp2() - 1.0) / (k.exp2() - 1.0)
}

/// Lighting amount of a vertex normal against a unit light direction.
///
/// Cosine of the angle between them, clamped to `[-1, 1]`; zero for a zero
/// normal.
#[inline]
fn light_amount(normal: Vec4, light: Vec4) -> f64 {
    let norm = normal.norm();
    if norm == 0.0 {
        return 0.0;
    }
    (normal.dot(light) / norm).clamp(-1.0, 1.0)
}

/// Light `mesh` in place.
///
/// `light_vector` points from the light into the scene; normals facing
/// against it are lit. The mesh's normals must be populated, e.g. with
/// [`Mesh::compute_normals`]. Calling this twice lights the already lit
/// phenotypes again.
pub fn light_mesh(mesh: &mut Mesh, light_vector: Vec4, light: &Phenotype, shininess: f64) {
    let dir = (-light_vector).normalized();

    for (normal, pheno) in mesh.normals.iter().zip(mesh.phenos.iter_mut()) {
        let amt = shininess_curve(light_amount(*normal, dir), shininess);
        if amt > 0.0 {
            let velocity = pheno.velocity;
            let weights = [1.0 - amt, amt];
            if let Some(lit) =
                interpolate_phenotypes(&[Some(*pheno), Some(*light)], Some(weights.as_slice()))
            {
                *pheno = lit.with_velocity(velocity);
            }
        } else if amt < 0.0 {
            pheno.velocity *= amt + 1.0;
        }
    }
}
