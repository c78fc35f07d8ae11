//! 3×3 transformation matrix for 2D homogeneous coordinates.
//!
//! Row-major. Builders premultiply: calling `rotate` and then `translate`
//! on the same matrix rotates a point first and translates it afterwards.

use crate::math::Vec4;

/// Row-major 3×3 matrix.
///
/// ```text
///   | a11 a12 a13 |
///   | a21 a22 a23 |
///   | a31 a32 a33 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    // ====================================================================
    // Construction
    // ====================================================================

    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub const fn translation(x: f64, y: f64) -> Self {
        Self::from_rows([[1.0, 0.0, x], [0.0, 1.0, y], [0.0, 0.0, 1.0]])
    }

    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_rows([[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Counter-clockwise rotation by `phi` radians (y-up).
    pub fn rotation(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    // ====================================================================
    // Operations
    // ====================================================================

    /// Standard product `self · b`.
    pub fn multiply(&self, b: &Mat3) -> Mat3 {
        let mut r = [[0.0; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * b.m[k][j]).sum();
            }
        }
        Mat3::from_rows(r)
    }

    /// `self = t · self`.
    pub fn premultiply(&mut self, t: &Mat3) -> &mut Self {
        *self = t.multiply(self);
        self
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.premultiply(&Mat3::translation(x, y))
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.premultiply(&Mat3::scaling(sx, sy))
    }

    pub fn rotate(&mut self, phi: f64) -> &mut Self {
        self.premultiply(&Mat3::rotation(phi))
    }

    /// Transform a point treated as `(x, y, 1)`.
    ///
    /// `x'` and `y'` come from the first two rows, `w'` from the third; `z` is
    /// carried through unchanged.
    #[inline]
    pub fn transform(&self, p: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4::new_w(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
            p.z,
            m[2][0] * p.x + m[2][1] * p.y + m[2][2],
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl core::ops::Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: Mat3) -> Mat3 {
        self.multiply(&rhs)
    }
}

// ============================================================================
// Tests
// ============================================================================
