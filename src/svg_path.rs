//! SVG path data parser.
//!
//! Turns the contents of a `d` attribute into a [`Figure`]. Every `M`
//! starts a new polygon; curves and arcs are flattened into
//! [`CURVE_SEGMENTS`] straight segments each.
//!
//! Parsing never fails. On malformed input it stops and returns what was
//! built so far; polygons left empty are dropped.

use crate::basics::deg2rad;
use crate::figure::{Figure, Polygon};
use crate::math::{Vec2, Vec4};

/// Line segments per flattened curve or arc.
pub const CURVE_SEGMENTS: usize = 24;

/// Upper bound on parsed commands per path.
pub const MAX_ITERATIONS: usize = 100_000;

/// Parse SVG path data into a figure.
///
/// ```
/// use phenoraster::svg_path::parse_figure_from_svg_path;
///
/// let fig = parse_figure_from_svg_path("M0,0 L10,0 L10,10 Z");
/// assert_eq!(fig.len(), 1);
/// assert_eq!(fig[0].len(), 4);
/// ```
pub fn parse_figure_from_svg_path(d: &str) -> Figure {
    let mut parser = PathParser::new(d);
    parser.run();
    parser
        .polygons
        .into_iter()
        .filter(|poly| !poly.is_empty())
        .collect()
}

// ============================================================================
// Scanner
// ============================================================================

struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_wsp(&mut self) {
        while matches!(self.peek(), Some(b'\t' | b' ' | b'\n' | b'\x0c' | b'\r')) {
            self.pos += 1;
        }
    }

    fn skip_comma_wsp(&mut self) {
        self.skip_wsp();
        if self.peek() == Some(b',') {
            self.pos += 1;
        }
        self.skip_wsp();
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn command(&mut self) -> Option<u8> {
        let c = self.peek()?;
        if b"MZLHVCSQTA".contains(&c.to_ascii_uppercase()) {
            self.pos += 1;
            Some(c)
        } else {
            None
        }
    }

    /// `[+-] digits [. digits] [(e|E) [+-] digits]`, with at least one
    /// mantissa digit. Leaves the cursor untouched on failure.
    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut digits = self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            self.pos = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                self.pos = mantissa_end;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).ok()?;
        match text.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    fn flag(&mut self) -> Option<bool> {
        let f = match self.peek()? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(f)
    }
}

// ============================================================================
// Parser state
// ============================================================================

/// Control point remembered for smooth curve commands.
#[derive(Clone, Copy)]
enum LastControl {
    None,
    Cubic(f64, f64),
    Quadratic(f64, f64),
}

struct PathParser<'a> {
    cur: Cursor<'a>,
    polygons: Vec<Polygon>,
    /// Index of the polygon being extended, `None` after `Z`.
    open: Option<usize>,
    cmd: Option<u8>,
    x: f64,
    y: f64,
    last_control: LastControl,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            cur: Cursor::new(d),
            polygons: Vec::new(),
            open: None,
            cmd: None,
            x: 0.0,
            y: 0.0,
            last_control: LastControl::None,
        }
    }

    fn run(&mut self) {
        let mut iterations = 0;
        while !self.cur.at_end() {
            if iterations == MAX_ITERATIONS {
                tracing::debug!(offset = self.cur.pos, "path data exceeds iteration limit");
                return;
            }
            iterations += 1;

            let start = self.cur.pos;
            self.cur.skip_wsp();
            if self.cur.at_end() {
                return;
            }
            if let Some(c) = self.cur.command() {
                self.cmd = Some(c);
            }
            self.cur.skip_wsp();

            let Some(cmd) = self.cmd else {
                tracing::debug!(offset = start, "path data must start with a command");
                return;
            };
            if self.step(cmd).is_none() {
                tracing::debug!(offset = self.cur.pos, command = %(cmd as char), "malformed path data");
                return;
            }
            self.cur.skip_wsp();
            if self.cur.pos == start {
                tracing::debug!(offset = start, "path data makes no progress");
                return;
            }
        }
    }

    /// Next coordinate, made absolute against `base` for relative commands.
    fn coord(&mut self, rel: bool, base: f64) -> Option<f64> {
        self.cur.skip_comma_wsp();
        let v = self.cur.number()?;
        Some(if rel { base + v } else { v })
    }

    fn point(&mut self, rel: bool) -> Option<(f64, f64)> {
        let x = self.coord(rel, self.x)?;
        let y = self.coord(rel, self.y)?;
        Some((x, y))
    }

    /// Polygon to draw into. After `Z`, drawing continues in a new polygon
    /// starting at the closing point.
    fn polygon(&mut self) -> Option<&mut Polygon> {
        let i = match self.open {
            Some(i) => i,
            None if self.polygons.is_empty() => return None,
            None => {
                self.polygons.push(vec![Vec4::new(self.x, self.y, 0.0)]);
                let i = self.polygons.len() - 1;
                self.open = Some(i);
                i
            }
        };
        self.polygons.get_mut(i)
    }

    fn line_to(&mut self, x: f64, y: f64) -> Option<()> {
        self.polygon()?.push(Vec4::new(x, y, 0.0));
        self.x = x;
        self.y = y;
        Some(())
    }

    /// Execute one command. `None` aborts parsing.
    fn step(&mut self, cmd: u8) -> Option<()> {
        let rel = cmd.is_ascii_lowercase();
        let (x1, y1) = (self.x, self.y);
        let mut control = LastControl::None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let (x, y) = self.point(rel)?;
                self.polygons.push(vec![Vec4::new(x, y, 0.0)]);
                self.open = Some(self.polygons.len() - 1);
                self.x = x;
                self.y = y;
                // further pairs are implicit line-tos
                self.cmd = Some(if rel { b'l' } else { b'L' });
            }
            b'Z' => {
                if let Some(first) = self.open.and_then(|i| self.polygons[i].first().copied()) {
                    self.line_to(first.x, first.y)?;
                }
                self.open = None;
            }
            b'L' => {
                let (x, y) = self.point(rel)?;
                self.line_to(x, y)?;
            }
            b'H' => {
                let x = self.coord(rel, self.x)?;
                self.line_to(x, y1)?;
            }
            b'V' => {
                let y = self.coord(rel, self.y)?;
                self.line_to(x1, y)?;
            }
            b'C' => {
                let (u1, v1) = self.point(rel)?;
                let (u2, v2) = self.point(rel)?;
                let (x, y) = self.point(rel)?;
                self.cubic(x1, y1, u1, v1, u2, v2, x, y)?;
                control = LastControl::Cubic(u2, v2);
            }
            b'S' => {
                let (u2, v2) = self.point(rel)?;
                let (x, y) = self.point(rel)?;
                let (u1, v1) = match self.last_control {
                    LastControl::Cubic(cx, cy) => (2.0 * x1 - cx, 2.0 * y1 - cy),
                    _ => (x1, y1),
                };
                self.cubic(x1, y1, u1, v1, u2, v2, x, y)?;
                control = LastControl::Cubic(u2, v2);
            }
            b'Q' => {
                let (u1, v1) = self.point(rel)?;
                let (x, y) = self.point(rel)?;
                self.quadratic(x1, y1, u1, v1, x, y)?;
                control = LastControl::Quadratic(u1, v1);
            }
            b'T' => {
                let (x, y) = self.point(rel)?;
                let (u1, v1) = match self.last_control {
                    LastControl::Quadratic(cx, cy) => (2.0 * x1 - cx, 2.0 * y1 - cy),
                    _ => (x1, y1),
                };
                self.quadratic(x1, y1, u1, v1, x, y)?;
                control = LastControl::Quadratic(u1, v1);
            }
            b'A' => {
                self.cur.skip_comma_wsp();
                let rx = self.cur.number()?;
                self.cur.skip_comma_wsp();
                let ry = self.cur.number()?;
                self.cur.skip_comma_wsp();
                let rotation = self.cur.number()?;
                self.cur.skip_comma_wsp();
                let large_arc = self.cur.flag()?;
                self.cur.skip_comma_wsp();
                let sweep = self.cur.flag()?;
                let (x, y) = self.point(rel)?;
                self.arc(x1, y1, rx, ry, deg2rad(rotation), large_arc, sweep, x, y)?;
            }
            _ => return None,
        }

        self.last_control = control;
        Some(())
    }

    // ========================================================================
    // Flattening
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn cubic(
        &mut self,
        x1: f64,
        y1: f64,
        cx1: f64,
        cy1: f64,
        cx2: f64,
        cy2: f64,
        x2: f64,
        y2: f64,
    ) -> Option<()> {
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f64 / CURVE_SEGMENTS as f64;
            let it = 1.0 - t;
            let a = it * it * it;
            let b = 3.0 * it * it * t;
            let c = 3.0 * it * t * t;
            let d = t * t * t;
            self.line_to(
                a * x1 + b * cx1 + c * cx2 + d * x2,
                a * y1 + b * cy1 + c * cy2 + d * y2,
            )?;
        }
        Some(())
    }

    fn quadratic(&mut self, x1: f64, y1: f64, cx: f64, cy: f64, x2: f64, y2: f64) -> Option<()> {
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f64 / CURVE_SEGMENTS as f64;
            let it = 1.0 - t;
            let a = it * it;
            let b = 2.0 * it * t;
            let c = t * t;
            self.line_to(a * x1 + b * cx + c * x2, a * y1 + b * cy + c * y2)?;
        }
        Some(())
    }

    /// Elliptical arc from endpoint parameterization, after the SVG
    /// implementation notes (sections B.2.4 and B.2.5).
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        x1: f64,
        y1: f64,
        rx: f64,
        ry: f64,
        phi: f64,
        large_arc: bool,
        sweep: bool,
        x2: f64,
        y2: f64,
    ) -> Option<()> {
        if rx == 0.0 || ry == 0.0 {
            return self.line_to(x2, y2);
        }
        if x1 == x2 && y1 == y2 {
            // zero-length arcs are omitted
            return Some(());
        }
        let mut rx = rx.abs();
        let mut ry = ry.abs();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let dx = (x1 - x2) / 2.0;
        let dy = (y1 - y2) / 2.0;
        let x1p = cos_phi * dx + sin_phi * dy;
        let y1p = -sin_phi * dx + cos_phi * dy;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let root = (num / den).max(0.0).sqrt();
        let sign = if large_arc != sweep { 1.0 } else { -1.0 };
        let cxp = sign * root * (rx * y1p / ry);
        let cyp = sign * root * (-ry * x1p / rx);

        let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

        let v_start = Vec2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v_end = Vec2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta1 = Vec2::new(1.0, 0.0).angle(v_start);
        let mut dtheta = v_start.angle(v_end);
        if !sweep && dtheta > 0.0 {
            dtheta -= 2.0 * std::f64::consts::PI;
        } else if sweep && dtheta < 0.0 {
            dtheta += 2.0 * std::f64::consts::PI;
        }

        for i in 1..CURVE_SEGMENTS {
            let theta = theta1 + dtheta * i as f64 / CURVE_SEGMENTS as f64;
            let (s, c) = theta.sin_cos();
            let ex = rx * c;
            let ey = ry * s;
            self.line_to(
                cos_phi * ex - sin_phi * ey + cx,
                sin_phi * ex + cos_phi * ey + cy,
            )?;
        }
        // land exactly on the endpoint
        self.line_to(x2, y2)
    }
}

// ============================================================================
// Tests
// ============================================================================
