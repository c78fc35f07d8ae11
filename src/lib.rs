//! # phenoraster
//!
//! Small software 3D rasterizer that renders vector shapes into grids of
//! note phenotypes, then turns those grids into piano-roll notes.
//!
//! A phenotype is the attribute vector of a note (velocity, pan, release,
//! pitch offset, filter cutoff and resonance, color). Geometry carries
//! phenotypes the way a conventional renderer carries colors:
//!
//! - 2D/3D polygon figures filled with even-odd or nonzero rules
//! - triangle meshes with per-vertex phenotypes, barycentric interpolation
//!   and an optional depth buffer
//! - per-vertex diffuse lighting and procedural solids
//! - SVG path data and CSS-like style strings as input formats
//! - box-filtered oversampling
//!
//! ## Pipeline
//!
//! 1. **Geometry**: parse a path or generate a solid
//! 2. **Transform**: model transform, lighting, projection, perspective divide
//! 3. **Rasterize**: fill figures and triangles into an oversampled [`Buffer`]
//! 4. **Downsample**: mix sub-samples into one phenotype per pixel
//! 5. **Render**: emit one [`NoteEvent`] per non-empty pixel
//!
//! [`scene::Scene`] wires the whole pipeline from a JSON description.

// Foundation types & math
pub mod basics;
pub mod bounding_rect;
pub mod mat3;
pub mod mat4;
pub mod math;

// Geometry
pub mod figure;
pub mod mesh;
pub mod phenotype;
pub mod shapes3d;

// Rasterization
pub mod buffer;
pub mod lighting;
pub mod rasterizer;
pub mod scanline;

// Input formats & output
pub mod notes;
pub mod scene;
pub mod style;
pub mod svg_path;

pub mod error;

pub use buffer::Buffer;
pub use error::{Error, Result};
pub use notes::NoteEvent;
