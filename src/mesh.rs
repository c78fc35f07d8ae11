//! Triangle meshes with per-vertex normals and phenotypes.

use crate::error::{Error, Result};
use crate::figure::{apply_perspective_points, transform_points};
use crate::mat4::Mat4;
use crate::math::Vec4;
use crate::phenotype::Phenotype;

/// Three vertex indices into a mesh. Winding direction is not significant.
pub type Tri = [usize; 3];

/// Parallel vertex arrays plus an index list.
///
/// `verts`, `normals` and `phenos` always have the same length; every index
/// in `tris` addresses a vertex. [`Mesh::new`] checks this.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub verts: Vec<Vec4>,
    pub normals: Vec<Vec4>,
    pub phenos: Vec<Phenotype>,
    pub tris: Vec<Tri>,
}

impl Mesh {
    /// Build a mesh with zero normals.
    pub fn new(verts: Vec<Vec4>, phenos: Vec<Phenotype>, tris: Vec<Tri>) -> Result<Self> {
        if phenos.len() != verts.len() {
            return Err(Error::invalid_mesh(format!(
                "{} vertices but {} phenotypes",
                verts.len(),
                phenos.len()
            )));
        }
        if let Some((i, tri)) = tris
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.iter().any(|&v| v >= verts.len()))
        {
            return Err(Error::invalid_mesh(format!(
                "triangle {i} {tri:?} indexes past {} vertices",
                verts.len()
            )));
        }
        Ok(Self {
            normals: vec![Vec4::zero(); verts.len()],
            verts,
            phenos,
            tris,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    /// Vertices of triangle `i`, `None` if out of range.
    pub fn triangle(&self, i: usize) -> Option<([Vec4; 3], [Phenotype; 3])> {
        let [a, b, c] = *self.tris.get(i)?;
        let verts = [*self.verts.get(a)?, *self.verts.get(b)?, *self.verts.get(c)?];
        let phenos = [*self.phenos.get(a)?, *self.phenos.get(b)?, *self.phenos.get(c)?];
        Some((verts, phenos))
    }

    /// Recompute per-vertex normals.
    ///
    /// Each vertex normal is the sum of the face normals
    /// `(v1 - v0) × (v2 - v0)` of the triangles using it, so larger faces
    /// weigh more. Vertices used by no triangle keep a zero normal.
    pub fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.verts.len(), Vec4::zero());
        for tri in &self.tris {
            let [a, b, c] = *tri;
            let (Some(&v0), Some(&v1), Some(&v2)) =
                (self.verts.get(a), self.verts.get(b), self.verts.get(c))
            else {
                continue;
            };
            let n = (v1 - v0).cross(v2 - v0);
            for &i in tri {
                self.normals[i] = self.normals[i] + n;
            }
        }
        for n in self.normals.iter_mut() {
            n.w = 0.0;
        }
    }

    /// Transform vertices as points and normals by the inverse transpose of
    /// `t`, in place. A singular `t` falls back to `t` itself for normals.
    pub fn transform(&mut self, t: &Mat4) {
        transform_points(&mut self.verts, t);
        let nm = t.normal_matrix().unwrap_or(*t);
        for n in self.normals.iter_mut() {
            *n = nm.transform_direction(*n);
        }
    }

    /// Transform vertices only, leaving normals untouched.
    ///
    /// Used for the projection step, after lighting has consumed the
    /// normals.
    pub fn transform_verts(&mut self, t: &Mat4) {
        transform_points(&mut self.verts, t);
    }

    /// Perspective divide of every vertex in place.
    pub fn apply_perspective(&mut self) {
        apply_perspective_points(&mut self.verts);
    }
}

/// Free-function form of [`Mesh::apply_perspective`].
pub fn apply_perspective_mesh(mesh: &mut Mesh) {
    mesh.apply_perspective();
}

// ============================================================================
// Tests
// ============================================================================
