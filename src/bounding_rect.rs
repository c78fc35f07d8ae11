//! Bounding box calculation.
//!
//! Computes the axis-aligned bounding box (x and y only) of point lists and
//! whole figures.

use crate::basics::BoxD;
use crate::figure::Figure;
use crate::math::Vec4;

/// Smallest box containing all `points`. Returns `None` for an empty list.
///
/// With `round`, the minimum is floored and the maximum ceiled so the box
/// covers whole pixels.
pub fn bounding_box(points: &[Vec4], round: bool) -> Option<BoxD> {
    let first = points.first()?;
    let mut x1 = first.x;
    let mut y1 = first.y;
    let mut x2 = first.x;
    let mut y2 = first.y;

    for p in &points[1..] {
        if p.x < x1 {
            x1 = p.x;
        }
        if p.y < y1 {
            y1 = p.y;
        }
        if p.x > x2 {
            x2 = p.x;
        }
        if p.y > y2 {
            y2 = p.y;
        }
    }

    let b = BoxD::new(x1, y1, x2, y2);
    Some(if round { b.rounded() } else { b })
}

/// Bounding box across every polygon of a figure.
pub fn figure_bounding_box(figure: &Figure, round: bool) -> Option<BoxD> {
    let b = figure
        .iter()
        .filter_map(|poly| bounding_box(poly, false))
        .reduce(|a, b| a.union(&b))?;
    Some(if round { b.rounded() } else { b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_triangle() {
        let pts = [
            Vec4::new(10.0, 20.0, 0.0),
            Vec4::new(50.0, 80.0, 0.0),
            Vec4::new(30.0, 10.0, 0.0),
        ];
        let r = bounding_box(&pts, false).unwrap();
        assert_eq!(r, BoxD::new(10.0, 10.0, 50.0, 80.0));
    }

    #[test]
    fn test_bounding_box_empty_returns_none() {
        assert!(bounding_box(&[], false).is_none());
        assert!(figure_bounding_box(&Vec::new(), true).is_none());
    }

    #[test]
    fn test_bounding_box_single_point() {
        let r = bounding_box(&[Vec4::new(42.0, 17.0, 0.0)], false).unwrap();
        assert_eq!(r, BoxD::new(42.0, 17.0, 42.0, 17.0));
    }

    #[test]
    fn test_bounding_box_rounded() {
        let pts = [Vec4::new(0.5, -0.5, 0.0), Vec4::new(2.2, 3.7, 0.0)];
        let r = bounding_box(&pts, true).unwrap();
        assert_eq!(r, BoxD::new(0.0, -1.0, 3.0, 4.0));
    }

    #[test]
    fn test_figure_bounding_box_skips_empty_polygons() {
        let fig = vec![
            vec![Vec4::new(0.0, 0.0, 0.0), Vec4::new(1.0, 1.0, 0.0)],
            Vec::new(),
            vec![Vec4::new(-3.0, 0.5, 0.0)],
        ];
        let r = figure_bounding_box(&fig, false).unwrap();
        assert_eq!(r, BoxD::new(-3.0, 0.0, 1.0, 1.0));
    }
}
