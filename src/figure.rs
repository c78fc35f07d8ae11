//! Figures: sets of implicitly closed polygons, filled as one shape.
//!
//! All transforms here work in place on caller-owned point lists so that
//! render loops don't allocate; cloning is explicit and always deep.

use crate::mat3::Mat3;
use crate::mat4::Mat4;
use crate::math::{Vec2, Vec4};

/// Ordered points; the last point connects back to the first.
pub type Polygon = Vec<Vec4>;

/// Polygons filled together as a single shape.
pub type Figure = Vec<Polygon>;

/// Smallest `w` used by the perspective divide.
pub const PERSPECTIVE_MIN_W: f64 = 1e-10;

/// Triples whose cross product is shorter than this count as collinear.
const COLLINEAR_EPSILON: f64 = 1e-12;

// ============================================================================
// Transforms
// ============================================================================

/// Transform all points in place.
pub fn transform_points(points: &mut [Vec4], t: &Mat4) {
    for p in points.iter_mut() {
        *p = t.transform(*p);
    }
}

/// Transform a figure in place.
pub fn transform_figure(figure: &mut Figure, t: &Mat4) {
    for poly in figure.iter_mut() {
        transform_points(poly, t);
    }
}

/// Transform a figure in place with a 2D matrix; `z` is carried through.
pub fn transform_figure_2d(figure: &mut Figure, t: &Mat3) {
    for p in figure.iter_mut().flatten() {
        *p = t.transform(*p);
    }
}

/// Deep copy of a figure.
pub fn clone_figure(figure: &Figure) -> Figure {
    figure.iter().map(|poly| poly.to_vec()).collect()
}

// ============================================================================
// Perspective division
// ============================================================================

/// Divide `x` and `y` by `w` in place.
///
/// `w` is clamped to [`PERSPECTIVE_MIN_W`] so points at or behind the eye
/// never divide by zero; they just land far away.
pub fn apply_perspective_points(points: &mut [Vec4]) {
    for p in points.iter_mut() {
        let w = p.w.max(PERSPECTIVE_MIN_W);
        p.x /= w;
        p.y /= w;
    }
}

pub fn apply_perspective_figure(figure: &mut Figure) {
    for poly in figure.iter_mut() {
        apply_perspective_points(poly);
    }
}

// ============================================================================
// Plane equation
// ============================================================================

/// Plane `normal · p = d` with a unit-length normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec4,
    pub d: f64,
}

impl Plane {
    /// Plane through three points, `None` if they are collinear.
    pub fn through(a: Vec4, b: Vec4, c: Vec4) -> Option<Plane> {
        let n = (b - a).cross(c - a);
        if n.norm() < COLLINEAR_EPSILON {
            return None;
        }
        let normal = n.normalized();
        Some(Plane {
            normal,
            d: normal.dot(a),
        })
    }

    /// Solve the plane for `z` at `(x, y)`. `None` when the plane is parallel
    /// to the z axis.
    #[inline]
    pub fn z_at(&self, x: f64, y: f64) -> Option<f64> {
        let n = self.normal;
        if n.z.abs() < COLLINEAR_EPSILON {
            return None;
        }
        Some((self.d - n.x * x - n.y * y) / n.z)
    }
}

/// Plane through the first non-collinear triple of consecutive points.
pub fn points_plane(points: &[Vec4]) -> Option<Plane> {
    points
        .windows(3)
        .find_map(|w| Plane::through(w[0], w[1], w[2]))
}

/// Plane of a figure, probing each polygon in turn.
pub fn figure_plane(figure: &Figure) -> Option<Plane> {
    figure.iter().find_map(|poly| points_plane(poly))
}

// ============================================================================
// 2D <-> 3D
// ============================================================================

/// Lift 2D polygons onto the plane `z`.
pub fn figure_from_2d(polygons: &[Vec<Vec2>], z: f64) -> Figure {
    polygons
        .iter()
        .map(|poly| poly.iter().map(|p| p.extend(z)).collect())
        .collect()
}

/// Drop `z` and `w`. Apply the perspective divide first if `w` matters.
pub fn figure_to_2d(figure: &Figure) -> Vec<Vec<Vec2>> {
    figure
        .iter()
        .map(|poly| poly.iter().map(|p| p.xy()).collect())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
