//! Point-in-figure tests.
//!
//! Two flavors of the same two algorithms:
//!
//! - brute force: [`crossing_number`] and [`winding_number`] walk every edge
//!   of a polygon for a single point;
//! - cached: [`ScanLine`] collects the edges crossing one horizontal line
//!   once, then answers per-`x` queries from that short list.
//!
//! Edges are taken half-open in `y` (`p0.y <= y < p1.y` upward, the reverse
//! downward), so a vertex lying exactly on the scan line is counted once.
//! Both flavors agree at every point; the rasterizer uses the cached one.

use crate::basics::FillingRule;
use crate::bounding_rect::bounding_box;
use crate::figure::Figure;
use crate::math::{edge_function, Vec4};

/// Closed-polygon edges `(p[i-1], p[i])`, starting with the closing edge.
fn edges(poly: &[Vec4]) -> impl Iterator<Item = (Vec4, Vec4)> + '_ {
    let n = poly.len();
    (0..n).map(move |i| (poly[(i + n - 1) % n], poly[i]))
}

/// `Some(true)` if the edge crosses `y` upward, `Some(false)` downward,
/// `None` if it doesn't cross.
#[inline]
fn crossing_direction(p0: Vec4, p1: Vec4, y: f64) -> Option<bool> {
    if p0.y <= y {
        (p1.y > y).then_some(true)
    } else {
        (p1.y <= y).then_some(false)
    }
}

/// `x` where the edge meets the horizontal line `y`.
#[inline]
fn intersect_x(p0: Vec4, p1: Vec4, y: f64) -> f64 {
    p0.x + (y - p0.y) / (p1.y - p0.y) * (p1.x - p0.x)
}

/// Signed contribution of a crossing edge to the winding number at `p`.
#[inline]
fn winding_step(p0: Vec4, p1: Vec4, upward: bool, p: Vec4) -> i32 {
    let e = edge_function(p0, p1, p);
    if upward && e > 0.0 {
        1
    } else if !upward && e < 0.0 {
        -1
    } else {
        0
    }
}

// ============================================================================
// Brute force
// ============================================================================

/// Number of polygon edges crossed by a ray from `p` towards `+x`.
pub fn crossing_number(poly: &[Vec4], p: Vec4) -> usize {
    edges(poly)
        .filter(|&(p0, p1)| {
            crossing_direction(p0, p1, p.y).is_some() && p.x < intersect_x(p0, p1, p.y)
        })
        .count()
}

/// Signed number of times the polygon winds around `p`.
pub fn winding_number(poly: &[Vec4], p: Vec4) -> i32 {
    edges(poly)
        .filter_map(|(p0, p1)| {
            crossing_direction(p0, p1, p.y).map(|up| winding_step(p0, p1, up, p))
        })
        .sum()
}

/// Whether `p` is inside `figure` under `rule`.
///
/// Polygons whose half-open bounding box doesn't contain `p` are skipped.
pub fn point_in_figure(figure: &Figure, p: Vec4, rule: FillingRule) -> bool {
    let candidates = figure
        .iter()
        .filter(|poly| bounding_box(poly, false).is_some_and(|b| b.contains(p.x, p.y)));
    match rule {
        FillingRule::EvenOdd => {
            let cn: usize = candidates.map(|poly| crossing_number(poly, p)).sum();
            cn % 2 == 1
        }
        FillingRule::NonZero => {
            let wn: i32 = candidates.map(|poly| winding_number(poly, p)).sum();
            wn != 0
        }
    }
}

// ============================================================================
// Scan line cache
// ============================================================================

/// An edge crossing a scan line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub p0: Vec4,
    pub p1: Vec4,
    pub upward: bool,
    /// `x` of the intersection with the scan line.
    pub cx: f64,
}

/// Edges of a figure crossing one horizontal line.
#[derive(Debug, Clone, Default)]
pub struct ScanLine {
    y: f64,
    crossings: Vec<Crossing>,
}

impl ScanLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the crossings of `figure` at height `y`.
    pub fn scan(figure: &Figure, y: f64) -> Self {
        let mut sl = Self::new();
        sl.rescan(figure, y);
        sl
    }

    /// Like [`ScanLine::scan`], reusing this scan line's storage.
    pub fn rescan(&mut self, figure: &Figure, y: f64) {
        self.y = y;
        self.crossings.clear();
        for poly in figure {
            for (p0, p1) in edges(poly) {
                if let Some(upward) = crossing_direction(p0, p1, y) {
                    self.crossings.push(Crossing {
                        p0,
                        p1,
                        upward,
                        cx: intersect_x(p0, p1, y),
                    });
                }
            }
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// Crossings strictly right of `x`.
    #[inline]
    pub fn crossing_number(&self, x: f64) -> usize {
        self.crossings.iter().filter(|c| x < c.cx).count()
    }

    #[inline]
    pub fn winding_number(&self, x: f64) -> i32 {
        let p = Vec4::new(x, self.y, 0.0);
        self.crossings
            .iter()
            .map(|c| winding_step(c.p0, c.p1, c.upward, p))
            .sum()
    }

    /// Whether `(x, y)` is inside under `rule`.
    #[inline]
    pub fn contains(&self, x: f64, rule: FillingRule) -> bool {
        match rule {
            FillingRule::EvenOdd => self.crossing_number(x) % 2 == 1,
            FillingRule::NonZero => self.winding_number(x) != 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
