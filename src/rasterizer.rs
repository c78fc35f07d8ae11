//! Figure and triangle rasterization into a [`Buffer`].
//!
//! Samples sit on the oversampled grid: sample `(sx, sy)` is tested at
//! world position `(sx / oversample + origin_x, sy / oversample + origin_y)`.
//! Nothing here fails; degenerate input simply draws nothing.
//!
//! With a depth channel, a sample is written only when its depth is not
//! behind the stored one (see [`Buffer::put`]).

use crate::basics::{iceil, ifloor, FillingRule};
use crate::bounding_rect::{bounding_box, figure_bounding_box};
use crate::buffer::Buffer;
use crate::figure::{figure_plane, Figure};
use crate::math::{edge_function, Vec4};
use crate::mesh::Mesh;
use crate::phenotype::{interpolate_phenotypes, Phenotype};
use crate::scanline::ScanLine;

/// Clamp the half-open sample range covering world `[lo, hi]` on one axis.
fn sample_range(lo: f64, hi: f64, origin: f64, ovs: usize, len: usize) -> (usize, usize) {
    let ovs = ovs as f64;
    let first = ifloor((lo - origin) * ovs).max(0);
    // one extra sample absorbs rounding at the far edge
    let last = iceil((hi - origin) * ovs).saturating_add(1).max(0);
    (first.min(len as i64) as usize, last.min(len as i64) as usize)
}

// ============================================================================
// Figures
// ============================================================================

/// Fill `figure` with a flat phenotype.
///
/// Each oversampled row is scanned once with [`ScanLine`]; inclusion then
/// follows `rule`. Depth comes from the figure's plane equation, or from
/// the first point's `z` if the figure has no usable plane.
pub fn draw_figure(buffer: &mut Buffer, figure: &Figure, fill: &Phenotype, rule: FillingRule) {
    let Some(bbox) = figure_bounding_box(figure, false) else {
        return;
    };

    let ovs = buffer.oversample();
    let ox = buffer.origin_x();
    let oy = buffer.origin_y();
    let (sy0, sy1) = sample_range(bbox.y0, bbox.y1, oy, ovs, buffer.sample_height());
    let (sx0, sx1) = sample_range(bbox.x0, bbox.x1, ox, ovs, buffer.sample_width());
    if sy0 >= sy1 || sx0 >= sx1 {
        return;
    }

    let plane = if buffer.has_depth() {
        figure_plane(figure)
    } else {
        None
    };
    let z_fallback = figure.iter().flatten().next().map_or(0.0, |p| p.z);

    let mut sl = ScanLine::new();
    for sy in sy0..sy1 {
        let y = sy as f64 / ovs as f64 + oy;
        sl.rescan(figure, y);
        if sl.is_empty() {
            continue;
        }
        for sx in sx0..sx1 {
            let x = sx as f64 / ovs as f64 + ox;
            if sl.contains(x, rule) {
                let z = plane.and_then(|pl| pl.z_at(x, y)).unwrap_or(z_fallback);
                let i = buffer.sample_index(sx, sy);
                buffer.put(i, *fill, z);
            }
        }
    }
}

// ============================================================================
// Triangles
// ============================================================================

/// Draw a triangle with per-vertex phenotypes.
///
/// Both windings are accepted. Phenotype and depth are interpolated with the
/// barycentric weights `e12 / e, e20 / e, e01 / e`, where `e` is the edge
/// function of the whole triangle.
pub fn draw_triangle(buffer: &mut Buffer, verts: &[Vec4; 3], phenos: &[Phenotype; 3]) {
    let [p0, p1, p2] = *verts;
    let e012 = edge_function(p0, p1, p2);
    if e012 == 0.0 || !e012.is_finite() {
        tracing::debug!("skipping zero-area triangle");
        return;
    }
    let Some(bbox) = bounding_box(verts, false) else {
        return;
    };

    // clip to whole logical pixels
    let ox = buffer.origin_x();
    let oy = buffer.origin_y();
    let x0 = ifloor(bbox.x0 - ox).max(0);
    let y0 = ifloor(bbox.y0 - oy).max(0);
    let x1 = iceil(bbox.x1 - ox).min(buffer.width() as i64);
    let y1 = iceil(bbox.y1 - oy).min(buffer.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let ovs = buffer.oversample();
    let candidates = phenos.map(Some);
    let (sx0, sx1) = (x0 as usize * ovs, x1 as usize * ovs);
    let (sy0, sy1) = (y0 as usize * ovs, y1 as usize * ovs);

    for sy in sy0..sy1 {
        let y = sy as f64 / ovs as f64 + oy;
        for sx in sx0..sx1 {
            let p = Vec4::new(sx as f64 / ovs as f64 + ox, y, 0.0);
            let e01 = edge_function(p0, p1, p);
            let e12 = edge_function(p1, p2, p);
            let e20 = edge_function(p2, p0, p);
            let inside = (e01 <= 0.0 && e12 <= 0.0 && e20 <= 0.0)
                || (e01 >= 0.0 && e12 >= 0.0 && e20 >= 0.0);
            if !inside {
                continue;
            }
            let wgt = [e12 / e012, e20 / e012, e01 / e012];
            let Some(pheno) = interpolate_phenotypes(&candidates, Some(wgt.as_slice())) else {
                continue;
            };
            let z = p0.z * wgt[0] + p1.z * wgt[1] + p2.z * wgt[2];
            let i = buffer.sample_index(sx, sy);
            buffer.put(i, pheno, z);
        }
    }
}

/// Draw every triangle of `mesh`.
///
/// Vertices are expected in buffer space already, i.e. projected and
/// divided by `w`.
#[tracing::instrument(skip(buffer, mesh), fields(verts = mesh.verts.len(), tris = mesh.tris.len()))]
pub fn draw_mesh(buffer: &mut Buffer, mesh: &Mesh) {
    for i in 0..mesh.triangle_count() {
        match mesh.triangle(i) {
            Some((verts, phenos)) => draw_triangle(buffer, &verts, &phenos),
            None => tracing::debug!(triangle = i, "skipping triangle with bad index"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanline::point_in_figure;

    const EPS: f64 = 1e-9;

    fn poly(pts: &[(f64, f64)], z: f64) -> Vec<Vec4> {
        pts.iter().map(|&(x, y)| Vec4::new(x, y, z)).collect()
    }

    fn pheno(velocity: f64, pan: f64) -> Phenotype {
        Phenotype {
            velocity,
            pan,
            ..Phenotype::default()
        }
    }

    fn assert_matches_brute_force(buffer: &Buffer, figure: &Figure, rule: FillingRule) {
        let ovs = buffer.oversample() as f64;
        for sy in 0..buffer.sample_height() {
            for sx in 0..buffer.sample_width() {
                let p = Vec4::new(
                    sx as f64 / ovs + buffer.origin_x(),
                    sy as f64 / ovs + buffer.origin_y(),
                    0.0,
                );
                assert_eq!(
                    buffer.sample(sx, sy).is_some(),
                    point_in_figure(figure, p, rule),
                    "sample ({sx}, {sy}) {rule:?}"
                );
            }
        }
    }

    #[test]
    fn test_draw_square() {
        let mut b = Buffer::new(10, 10, 0).unwrap();
        let fig = vec![poly(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], 0.0)];
        let p = pheno(1.0, 0.3);
        draw_figure(&mut b, &fig, &p, FillingRule::EvenOdd);
        assert_eq!(b.phenotype_at(2, 2), Some(p));
        assert_eq!(b.phenotype_at(5, 5), Some(p));
        assert_eq!(b.phenotype_at(6, 6), None);
        assert_eq!(b.phenotype_at(1, 3), None);
        let filled = b.samples().iter().filter(|s| s.is_some()).count();
        assert_eq!(filled, 16);
    }

    #[test]
    fn test_fill_agrees_with_brute_force() {
        let star = vec![poly(
            &[(5.0, 0.0), (8.0, 9.5), (0.2, 3.6), (9.8, 3.6), (2.0, 9.5)],
            0.0,
        )];
        let holes = vec![
            poly(&[(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0)], 0.0),
            poly(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)], 0.0),
            poly(&[(4.0, 0.5), (8.5, 5.0), (4.0, 9.5)], 0.0),
        ];
        for fig in [star, holes] {
            for rule in [FillingRule::EvenOdd, FillingRule::NonZero] {
                let mut b = Buffer::new(12, 12, 2).unwrap();
                b.set_origin(-1.0, -1.0);
                draw_figure(&mut b, &fig, &Phenotype::default(), rule);
                assert_matches_brute_force(&b, &fig, rule);
            }
        }
    }

    #[test]
    fn test_origin_shifts_figure() {
        let mut b = Buffer::new(4, 4, 0).unwrap();
        b.set_origin(10.0, 20.0);
        let fig = vec![poly(&[(10.0, 20.0), (12.0, 20.0), (12.0, 22.0), (10.0, 22.0)], 0.0)];
        draw_figure(&mut b, &fig, &Phenotype::default(), FillingRule::NonZero);
        assert!(b.phenotype_at(0, 0).is_some());
        assert!(b.phenotype_at(1, 1).is_some());
        assert!(b.phenotype_at(2, 2).is_none());
    }

    #[test]
    fn test_figure_outside_buffer_draws_nothing() {
        let mut b = Buffer::new(4, 4, 1).unwrap();
        let fig = vec![poly(&[(-9.0, -9.0), (-5.0, -9.0), (-5.0, -5.0)], 0.0)];
        draw_figure(&mut b, &fig, &Phenotype::default(), FillingRule::EvenOdd);
        draw_figure(&mut b, &Vec::new(), &Phenotype::default(), FillingRule::EvenOdd);
        assert!(b.samples().iter().all(Option::is_none));
    }

    #[test]
    fn test_figure_depth_from_plane() {
        let mut b = Buffer::new(4, 4, 0).unwrap().with_depth();
        // plane z = x
        let fig = vec![vec![
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(4.0, 0.0, 4.0),
            Vec4::new(4.0, 4.0, 4.0),
            Vec4::new(0.0, 4.0, 0.0),
        ]];
        draw_figure(&mut b, &fig, &Phenotype::default(), FillingRule::EvenOdd);
        assert!((b.depth_at(3, 1).unwrap() - 3.0).abs() < EPS);
        assert!((b.depth_at(1, 2).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_figure_depth_nearest_wins_in_any_order() {
        let near = pheno(1.0, 0.0);
        let far = pheno(1.0, 1.0);
        let sq = |z| vec![poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], z)];
        for order in [[(2.0, near), (-2.0, far)], [(-2.0, far), (2.0, near)]] {
            let mut b = Buffer::new(4, 4, 0).unwrap().with_depth();
            for (z, p) in order {
                draw_figure(&mut b, &sq(z), &p, FillingRule::EvenOdd);
            }
            assert_eq!(b.phenotype_at(1, 1), Some(near));
        }
    }

    #[test]
    fn test_triangle_barycentric_interpolation() {
        let mut b = Buffer::new(8, 8, 0).unwrap();
        let verts = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(8.0, 0.0, 0.0),
            Vec4::new(0.0, 8.0, 0.0),
        ];
        let phenos = [pheno(1.0, 0.0), pheno(0.5, 1.0), pheno(0.2, 0.5)];
        draw_triangle(&mut b, &verts, &phenos);

        let e = edge_function(verts[0], verts[1], verts[2]);
        for (sx, sy) in [(1, 1), (2, 3), (5, 1), (1, 5)] {
            let p = Vec4::new(sx as f64, sy as f64, 0.0);
            let w = [
                edge_function(verts[1], verts[2], p) / e,
                edge_function(verts[2], verts[0], p) / e,
                edge_function(verts[0], verts[1], p) / e,
            ];
            assert!((w.iter().sum::<f64>() - 1.0).abs() < EPS);
            let expected = interpolate_phenotypes(&phenos.map(Some), Some(w.as_slice())).unwrap();
            let got = b.sample(sx, sy).unwrap();
            assert!((got.velocity - expected.velocity).abs() < EPS);
            assert!((got.pan - expected.pan).abs() < EPS);
        }
        assert!(b.sample(6, 6).is_none());
    }

    #[test]
    fn test_triangle_vertices_take_vertex_phenotype() {
        let mut b = Buffer::new(8, 8, 0).unwrap();
        let verts = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(8.0, 0.0, 0.0),
            Vec4::new(0.0, 8.0, 0.0),
        ];
        let phenos = [pheno(1.0, 0.0), pheno(1.0, 1.0), pheno(1.0, 0.5)];
        draw_triangle(&mut b, &verts, &phenos);
        assert!((b.sample(0, 0).unwrap().pan - 0.0).abs() < EPS);
    }

    #[test]
    fn test_triangle_both_windings() {
        let cw = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(4.0, 0.0, 0.0),
            Vec4::new(0.0, 4.0, 0.0),
        ];
        let ccw = [cw[0], cw[2], cw[1]];
        let phenos = [Phenotype::default(); 3];
        let mut a = Buffer::new(4, 4, 1).unwrap();
        let mut b = Buffer::new(4, 4, 1).unwrap();
        draw_triangle(&mut a, &cw, &phenos);
        draw_triangle(&mut b, &ccw, &phenos);
        let count = |buf: &Buffer| buf.samples().iter().filter(|s| s.is_some()).count();
        assert!(count(&a) > 0);
        assert_eq!(count(&a), count(&b));
    }

    #[test]
    fn test_degenerate_triangle_is_noop() {
        let mut b = Buffer::new(4, 4, 0).unwrap();
        let line = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(2.0, 2.0, 0.0),
            Vec4::new(4.0, 4.0, 0.0),
        ];
        draw_triangle(&mut b, &line, &[Phenotype::default(); 3]);
        assert!(b.samples().iter().all(Option::is_none));
    }

    #[derive(Clone, Default)]
    struct LogSink(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_degenerate_triangle_logged_at_debug() {
        let sink = LogSink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();

        let mut b = Buffer::new(4, 4, 0).unwrap();
        let line = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(2.0, 2.0, 0.0),
            Vec4::new(4.0, 4.0, 0.0),
        ];
        tracing::subscriber::with_default(subscriber, || {
            draw_triangle(&mut b, &line, &[Phenotype::default(); 3]);
        });

        let log = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("skipping zero-area triangle"));
    }

    #[test]
    fn test_triangle_clipped_to_buffer() {
        let mut b = Buffer::new(4, 4, 1).unwrap();
        let verts = [
            Vec4::new(-10.0, -10.0, 0.0),
            Vec4::new(20.0, -10.0, 0.0),
            Vec4::new(-10.0, 20.0, 0.0),
        ];
        draw_triangle(&mut b, &verts, &[Phenotype::default(); 3]);
        assert!(b.samples().iter().all(Option::is_some));
    }

    #[test]
    fn test_triangle_depth_interpolated() {
        let mut b = Buffer::new(4, 4, 0).unwrap().with_depth();
        let verts = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(4.0, 0.0, 4.0),
            Vec4::new(0.0, 4.0, 0.0),
        ];
        draw_triangle(&mut b, &verts, &[Phenotype::default(); 3]);
        assert!((b.depth_at(2, 1).unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_draw_mesh() {
        let verts = vec![
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(4.0, 0.0, 0.0),
            Vec4::new(4.0, 4.0, 0.0),
            Vec4::new(0.0, 4.0, 0.0),
        ];
        let mesh = Mesh::new(verts, vec![pheno(1.0, 0.2); 4], vec![[0, 1, 2], [0, 2, 3]]).unwrap();
        let mut b = Buffer::new(6, 6, 1).unwrap();
        draw_mesh(&mut b, &mesh);
        for y in 0..4 {
            for x in 0..4 {
                let p = b.phenotype_at(x, y).unwrap();
                assert!((p.pan - 0.2).abs() < EPS);
                assert!((p.velocity - 1.0).abs() < EPS);
            }
        }
        assert!(b.phenotype_at(5, 5).is_none());
    }

    #[test]
    fn test_draw_mesh_skips_bad_indices() {
        let mut mesh = Mesh::new(
            vec![Vec4::new(0.0, 0.0, 0.0), Vec4::new(2.0, 0.0, 0.0), Vec4::new(0.0, 2.0, 0.0)],
            vec![Phenotype::default(); 3],
            vec![[0, 1, 2]],
        )
        .unwrap();
        mesh.tris.push([0, 1, 9]);
        let mut b = Buffer::new(2, 2, 0).unwrap();
        draw_mesh(&mut b, &mesh);
        assert!(b.phenotype_at(0, 0).is_some());
    }
}
