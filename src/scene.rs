//! JSON scene descriptions.
//!
//! A scene fixes the buffer (size, oversampling, depth, origin), the note
//! placement, and a list of shapes drawn in order. Shapes are either SVG
//! paths filled with a flat style, or procedural solids that are
//! transformed, lit, projected and rasterized.
//!
//! ```json
//! {
//!   "width": 16, "height": 12, "oversample_shift": 2, "depth": true,
//!   "note_offset": [0, 60],
//!   "shapes": [
//!     { "type": "path", "d": "M0 0 H16 V2 H0 Z", "style": "velocity: 0.5" },
//!     { "type": "solid", "solid": { "kind": "cube" },
//!       "transform": [{ "scale": [6, 6, 6] }, { "rotate_y": 0.6 }, { "translate": [8, 6, 0] }],
//!       "light": { "direction": [0, 0, -1], "style": "pan: 1" } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::basics::FillingRule;
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::figure::{apply_perspective_figure, transform_figure};
use crate::lighting::light_mesh;
use crate::mat4::Mat4;
use crate::math::Vec4;
use crate::mesh::Mesh;
use crate::notes::{render_notes, NoteEvent, DEFAULT_PIXEL_WIDTH};
use crate::phenotype::Phenotype;
use crate::rasterizer::{draw_figure, draw_mesh};
use crate::shapes3d::{create_cube, create_cylinder, create_prism, create_sphere, create_torus};
use crate::style::parse_phenotype_from_style;
use crate::svg_path::parse_figure_from_svg_path;

fn default_pixel_width() -> u32 {
    DEFAULT_PIXEL_WIDTH
}

fn default_ratio() -> f64 {
    1.0
}

// ============================================================================
// Description types
// ============================================================================

/// One step of a transform chain. Chains apply in listed order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    Translate([f64; 3]),
    Scale([f64; 3]),
    /// Radians.
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    /// Perspective pinch, see [`Mat4::projection`].
    Perspective(f64),
}

/// Fold a transform chain into one matrix.
pub fn compose(ops: &[TransformOp]) -> Mat4 {
    let mut m = Mat4::identity();
    for op in ops {
        match *op {
            TransformOp::Translate([x, y, z]) => m.translate(x, y, z),
            TransformOp::Scale([x, y, z]) => m.scale(x, y, z),
            TransformOp::RotateX(phi) => m.rotate_x(phi),
            TransformOp::RotateY(phi) => m.rotate_y(phi),
            TransformOp::RotateZ(phi) => m.rotate_z(phi),
            TransformOp::Perspective(pinch) => m.perspective(pinch),
        };
    }
    m
}

/// Procedural solid, see [`crate::shapes3d`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solid {
    Cube,
    Prism {
        sides: usize,
        #[serde(default = "default_ratio")]
        rtop: f64,
    },
    Cylinder {
        sides: usize,
        #[serde(default = "default_ratio")]
        rtop: f64,
    },
    Sphere {
        sides: usize,
    },
    Torus {
        sides: usize,
        #[serde(default = "default_ratio")]
        ratio: f64,
    },
}

impl Solid {
    pub fn build(&self, pheno: &Phenotype) -> Mesh {
        match *self {
            Solid::Cube => create_cube(pheno),
            Solid::Prism { sides, rtop } => create_prism(pheno, sides, rtop),
            Solid::Cylinder { sides, rtop } => create_cylinder(pheno, sides, rtop),
            Solid::Sphere { sides } => create_sphere(pheno, sides),
            Solid::Torus { sides, ratio } => create_torus(pheno, sides, ratio),
        }
    }
}

/// Directional light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Direction the light travels in.
    pub direction: [f64; 3],
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub shininess: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Path {
        d: String,
        #[serde(default)]
        style: String,
        #[serde(default)]
        fill_rule: FillingRule,
        #[serde(default)]
        transform: Vec<TransformOp>,
    },
    Solid {
        solid: Solid,
        #[serde(default)]
        style: String,
        /// Model transform; normals are computed after it.
        #[serde(default)]
        transform: Vec<TransformOp>,
        /// Applied to vertices only, after lighting.
        #[serde(default)]
        projection: Vec<TransformOp>,
        #[serde(default)]
        light: Option<Light>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub oversample_shift: u32,
    #[serde(default)]
    pub depth: bool,
    #[serde(default)]
    pub origin: [f64; 2],
    /// Column and note number of the top-left pixel.
    #[serde(default)]
    pub note_offset: [i64; 2],
    #[serde(default = "default_pixel_width")]
    pub pixel_width: u32,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

// ============================================================================
// Rendering
// ============================================================================

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rasterize every shape into a fresh buffer.
    #[tracing::instrument(skip(self), fields(width = self.width, height = self.height, shapes = self.shapes.len()))]
    pub fn render(&self) -> Result<Buffer> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::scene(format!(
                "scene size {}x{} is empty",
                self.width, self.height
            )));
        }
        let mut buffer = Buffer::new(self.width, self.height, self.oversample_shift)?;
        if self.depth {
            buffer.enable_depth();
        }
        buffer.set_origin(self.origin[0], self.origin[1]);

        for (i, shape) in self.shapes.iter().enumerate() {
            tracing::trace!(shape = i, "drawing shape");
            draw_shape(&mut buffer, shape);
        }
        Ok(buffer)
    }

    /// Render and convert to note events.
    pub fn notes(&self) -> Result<Vec<NoteEvent>> {
        let buffer = self.render()?;
        Ok(render_notes(
            &buffer,
            self.note_offset[0],
            self.note_offset[1],
            self.pixel_width,
        ))
    }
}

fn draw_shape(buffer: &mut Buffer, shape: &Shape) {
    match shape {
        Shape::Path {
            d,
            style,
            fill_rule,
            transform,
        } => {
            let mut figure = parse_figure_from_svg_path(d);
            if figure.is_empty() {
                tracing::debug!(d = %d, "path has no polygons");
                return;
            }
            transform_figure(&mut figure, &compose(transform));
            apply_perspective_figure(&mut figure);
            draw_figure(buffer, &figure, &parse_phenotype_from_style(style), *fill_rule);
        }
        Shape::Solid {
            solid,
            style,
            transform,
            projection,
            light,
        } => {
            let mut mesh = solid.build(&parse_phenotype_from_style(style));
            mesh.transform(&compose(transform));
            mesh.compute_normals();
            if let Some(light) = light {
                let [x, y, z] = light.direction;
                light_mesh(
                    &mut mesh,
                    Vec4::new(x, y, z),
                    &parse_phenotype_from_style(&light.style),
                    light.shininess,
                );
            }
            mesh.transform_verts(&compose(projection));
            mesh.apply_perspective();
            draw_mesh(buffer, &mesh);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
