//! Foundation types and small numeric helpers.
//!
//! Everything else in the crate depends on these: integer rounding used for
//! pixel bounds, the polygon filling rule, and the axis-aligned box.

use serde::{Deserialize, Serialize};

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Floor a double to the nearest integer toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i64 {
    v.floor() as i64
}

/// Ceiling of a double as a signed integer.
#[inline]
pub fn iceil(v: f64) -> i64 {
    v.ceil() as i64
}

/// Round a double to the nearest integer (round half away from zero).
#[inline]
pub fn iround(v: f64) -> i64 {
    v.round() as i64
}

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
///
/// `EvenOdd` counts edge crossings (crossing number), `NonZero` counts signed
/// crossings (winding number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillingRule {
    #[default]
    EvenOdd,
    NonZero,
}

// ============================================================================
// Mathematical constants
// ============================================================================

pub const PI: f64 = std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}


// ============================================================================
// BoxD
// ============================================================================

/// Axis-aligned box with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxD {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoxD {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Half-open containment test: `[x0, x1) × [y0, y1)`.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Integer bounds: floor of the minimum, ceiling of the maximum.
    pub fn rounded(&self) -> Self {
        Self {
            x0: self.x0.floor(),
            y0: self.y0.floor(),
            x1: self.x1.ceil(),
            y1: self.y1.ceil(),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoxD) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
