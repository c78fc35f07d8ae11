//! 4×4 transformation matrix for 3D homogeneous coordinates.
//!
//! Row-major, applied to column vectors: `p' = M · p`. All builders
//! premultiply (`self = T · self`), so a chain of builder calls applies its
//! transforms in call order. `perspective` feeds `z` into `w`; remember to
//! divide by `w` (see [`crate::figure::apply_perspective_figure`]) before
//! rasterizing.

use crate::math::Vec4;

/// Pivots smaller than this are treated as singular by [`Mat4::inverted`].
pub const SINGULAR_EPSILON: f64 = 1e-14;

/// Row-major 4×4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f64; 4]; 4],
}

impl Mat4 {
    // ====================================================================
    // Construction
    // ====================================================================

    pub const fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub const fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub const fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Perspective-like projection: `w' = w - pinch * z`.
    ///
    /// The projection plane sits at `z = 0` (where `w` stays 1); `-z` points
    /// into the screen, so points with larger `z` come out bigger.
    pub const fn projection(pinch: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, -pinch, 1.0],
        ])
    }

    // ====================================================================
    // Operations
    // ====================================================================

    /// Standard product `self · b`.
    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[i][0] * b.m[0][j]
                    + self.m[i][1] * b.m[1][j]
                    + self.m[i][2] * b.m[2][j]
                    + self.m[i][3] * b.m[3][j];
            }
        }
        Mat4::from_rows(r)
    }

    /// `self = t · self`.
    pub fn premultiply(&mut self, t: &Mat4) -> &mut Self {
        *self = t.multiply(self);
        self
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.premultiply(&Mat4::translation(x, y, z))
    }

    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.premultiply(&Mat4::scaling(sx, sy, sz))
    }

    pub fn rotate_x(&mut self, phi: f64) -> &mut Self {
        self.premultiply(&Mat4::rotation_x(phi))
    }

    pub fn rotate_y(&mut self, phi: f64) -> &mut Self {
        self.premultiply(&Mat4::rotation_y(phi))
    }

    pub fn rotate_z(&mut self, phi: f64) -> &mut Self {
        self.premultiply(&Mat4::rotation_z(phi))
    }

    pub fn perspective(&mut self, pinch: f64) -> &mut Self {
        self.premultiply(&Mat4::projection(pinch))
    }

    /// Full homogeneous transform `M · p`.
    #[inline]
    pub fn transform(&self, p: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4::new_w(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3] * p.w,
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3] * p.w,
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3] * p.w,
            m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3] * p.w,
        )
    }

    /// Transform a direction: upper-left 3×3 only, no translation, `w` kept.
    #[inline]
    pub fn transform_direction(&self, d: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4::new_w(
            m[0][0] * d.x + m[0][1] * d.y + m[0][2] * d.z,
            m[1][0] * d.x + m[1][1] * d.y + m[1][2] * d.z,
            m[2][0] * d.x + m[2][1] * d.y + m[2][2] * d.z,
            d.w,
        )
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    /// Returns `None` for singular matrices.
    pub fn inverted(&self) -> Option<Mat4> {
        let mut a = self.m;
        let mut inv = Mat4::identity().m;

        for col in 0..4 {
            let pivot = (col..4)
                .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
                .unwrap_or(col);
            if a[pivot][col].abs() < SINGULAR_EPSILON {
                return None;
            }
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let d = a[col][col];
            for j in 0..4 {
                a[col][j] /= d;
                inv[col][j] /= d;
            }
            for row in 0..4 {
                if row == col {
                    continue;
                }
                let f = a[row][col];
                if f == 0.0 {
                    continue;
                }
                for j in 0..4 {
                    a[row][j] -= f * a[col][j];
                    inv[row][j] -= f * inv[col][j];
                }
            }
        }
        Some(Mat4::from_rows(inv))
    }

    pub fn transposed(&self) -> Mat4 {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[j][i];
            }
        }
        Mat4::from_rows(r)
    }

    /// Inverse transpose, for transforming surface normals so they stay
    /// perpendicular under non-uniform scaling. `None` for singular
    /// matrices.
    pub fn normal_matrix(&self) -> Option<Mat4> {
        self.inverted().map(|inv| inv.transposed())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl core::ops::Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::PI;

    const EPS: f64 = 1e-10;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a.x - b.x).abs() < EPS
            && (a.y - b.y).abs() < EPS
            && (a.z - b.z).abs() < EPS
            && (a.w - b.w).abs() < EPS
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec4::new(1.0, -2.0, 3.0);
        assert_eq!(Mat4::identity().transform(p), p);
    }

    #[test]
    fn test_translate_scale_order() {
        let mut m = Mat4::identity();
        m.scale(2.0, 2.0, 2.0).translate(1.0, 0.0, 0.0);
        let p = m.transform(Vec4::new(1.0, 1.0, 1.0));
        assert!(close(p, Vec4::new(3.0, 2.0, 2.0)));
    }

    #[test]
    fn test_rotations() {
        let p = Vec4::new(0.0, 1.0, 0.0);
        assert!(close(
            Mat4::rotation_x(PI / 2.0).transform(p),
            Vec4::new(0.0, 0.0, 1.0)
        ));
        let q = Vec4::new(1.0, 0.0, 0.0);
        assert!(close(
            Mat4::rotation_y(PI / 2.0).transform(q),
            Vec4::new(0.0, 0.0, -1.0)
        ));
        assert!(close(
            Mat4::rotation_z(PI / 2.0).transform(q),
            Vec4::new(0.0, 1.0, 0.0)
        ));
    }

    #[test]
    fn test_projection_w() {
        let mut m = Mat4::identity();
        m.perspective(0.5);
        let p = m.transform(Vec4::new(2.0, 2.0, 1.0));
        assert!((p.w - 0.5).abs() < EPS);
        let q = m.transform(Vec4::new(2.0, 2.0, 0.0));
        assert!((q.w - 1.0).abs() < EPS);
    }

    #[test]
    fn test_direction_ignores_translation() {
        let m = Mat4::translation(5.0, 5.0, 5.0);
        let d = m.transform_direction(Vec4::new_w(1.0, 0.0, 0.0, 0.0));
        assert_eq!((d.x, d.y, d.z), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let mut m = Mat4::identity();
        m.rotate_x(0.3)
            .rotate_y(-1.1)
            .scale(2.0, 0.5, 3.0)
            .translate(4.0, -2.0, 1.0);
        let inv = m.inverted().unwrap();
        assert_identity(&(m * inv));
        assert_identity(&(inv * m));
    }

    fn assert_identity(m: &Mat4) {
        let id = Mat4::identity();
        for (a, b) in m.m.iter().flatten().zip(id.m.iter().flatten()) {
            assert!((a - b).abs() < 1e-9, "{m:?}");
        }
    }

    #[test]
    fn test_transposed() {
        let mut m = Mat4::translation(1.0, 2.0, 3.0);
        m.rotate_z(0.4);
        let t = m.transposed();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(t.m[i][j], m.m[j][i]);
            }
        }
    }

    #[test]
    fn test_normal_matrix_keeps_normals_perpendicular() {
        // plane x + y = 0 squashed along x
        let m = Mat4::scaling(4.0, 1.0, 1.0);
        let nm = m.normal_matrix().unwrap();
        let tangent = m.transform_direction(Vec4::new_w(1.0, -1.0, 0.0, 0.0));
        let normal = nm.transform_direction(Vec4::new_w(1.0, 1.0, 0.0, 0.0));
        assert!(tangent.dot(normal).abs() < EPS);
        assert!(Mat4::scaling(0.0, 1.0, 1.0).normal_matrix().is_none());
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverted().is_none());
    }
}
