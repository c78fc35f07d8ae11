//! Vector types and geometric math utilities.
//!
//! `Vec2`, `Vec3` and the homogeneous `Vec4` are plain `Copy` values. The
//! products and norms defined on `Vec4` ignore the homogeneous `w`
//! component; `w` only matters to matrix transforms and perspective division.

use core::ops::{Add, Mul, Neg, Sub};

// ============================================================================
// Vec2
// ============================================================================

/// 2D vector `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Lift onto the plane `z`, with `w = 1`.
    pub fn extend(self, z: f64) -> Vec4 {
        Vec4::new(self.x, self.y, z)
    }

    pub fn dot(self, b: Vec2) -> f64 {
        self.x * b.x + self.y * b.y
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Signed angle from `self` to `b`, in `[-PI, PI]`.
    pub fn angle(self, b: Vec2) -> f64 {
        let sign = if self.x * b.y - self.y * b.x > 0.0 {
            1.0
        } else {
            -1.0
        };
        let p = (self.dot(b) / (self.norm() * b.norm())).clamp(-1.0, 1.0);
        sign * p.acos()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x + b.x, self.y + b.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x - b.x, self.y - b.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

// ============================================================================
// Vec3
// ============================================================================

/// 3D vector `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec4> for Vec3 {
    fn from(v: Vec4) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

// ============================================================================
// Vec4
// ============================================================================

/// Homogeneous vector `(x, y, z, w)`. `w` defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    /// Point with `w = 1`.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const fn new_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// The zero vector, `w` included. Used for uninitialized normals.
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 0.0,
        }
    }

    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn dot(self, b: Vec4) -> f64 {
        self.x * b.x + self.y * b.y + self.z * b.z
    }

    pub fn cross(self, b: Vec4) -> Vec4 {
        Vec4::new(
            self.y * b.z - self.z * b.y,
            self.z * b.x - self.x * b.z,
            self.x * b.y - self.y * b.x,
        )
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy. A zero vector stays zero.
    pub fn normalized(self) -> Vec4 {
        let n = self.norm();
        if n == 0.0 {
            return Vec4::new(0.0, 0.0, 0.0);
        }
        Vec4::new(self.x / n, self.y / n, self.z / n)
    }

    /// Unsigned angle between `self` and `b`, in `[0, PI]`.
    pub fn angle(self, b: Vec4) -> f64 {
        let p = (self.dot(b) / (self.norm() * b.norm())).clamp(-1.0, 1.0);
        p.acos()
    }
}

impl Default for Vec4 {
    fn default() -> Self {
        Vec4::new(0.0, 0.0, 0.0)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, b: Vec4) -> Vec4 {
        Vec4::new_w(self.x + b.x, self.y + b.y, self.z + b.z, self.w)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, b: Vec4) -> Vec4 {
        Vec4::new_w(self.x - b.x, self.y - b.y, self.z - b.z, self.w)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;
    fn neg(self) -> Vec4 {
        Vec4::new_w(-self.x, -self.y, -self.z, self.w)
    }
}

impl Mul<f64> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f64) -> Vec4 {
        Vec4::new_w(self.x * s, self.y * s, self.z * s, self.w)
    }
}

// ============================================================================
// Edge function
// ============================================================================

/// Signed area proxy of the triangle `abc`, using `x` and `y` only.
///
/// Positive when `c` lies left of the directed line `a → b` (in a y-down
/// raster that is clockwise), negative when right, zero when collinear.
#[inline]
pub fn edge_function(a: Vec4, b: Vec4, c: Vec4) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

// ============================================================================
// Tests
// ============================================================================
