//! Oversampled phenotype buffer.
//!
//! A `Buffer` covers `width × height` logical pixels, each split into
//! `oversample × oversample` sub-samples. Samples hold an optional
//! [`Phenotype`]; `None` means nothing was drawn there. An optional depth
//! channel runs parallel to the samples.
//!
//! Sub-samples are stored row-major over the full oversampled grid, so the
//! sample at oversampled coordinates `(sx, sy)` lives at
//! `sy * width * oversample + sx`.

use crate::error::{Error, Result};
use crate::phenotype::{mix_phenotypes, Phenotype};

/// Largest accepted oversample shift (`oversample = 1 << shift`).
pub const MAX_OVERSAMPLE_SHIFT: u32 = 4;

/// Most sub-samples a single pixel can have.
const MAX_PIXEL_SAMPLES: usize = 1 << (2 * MAX_OVERSAMPLE_SHIFT);

/// Oversampled grid of optional phenotypes with an optional depth channel.
#[derive(Debug, Clone)]
pub struct Buffer {
    width: usize,
    height: usize,
    oversample: usize,
    data: Vec<Option<Phenotype>>,
    depth: Option<Vec<f64>>,
    origin_x: f64,
    origin_y: f64,
}

impl Buffer {
    /// Create an empty buffer with `2^oversample_shift` sub-samples per
    /// pixel and axis.
    pub fn new(width: usize, height: usize, oversample_shift: u32) -> Result<Self> {
        if oversample_shift > MAX_OVERSAMPLE_SHIFT {
            return Err(Error::invalid_buffer(format!(
                "oversample shift {oversample_shift} exceeds {MAX_OVERSAMPLE_SHIFT}"
            )));
        }
        let oversample = 1usize << oversample_shift;
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(oversample * oversample))
            .ok_or_else(|| Error::invalid_buffer(format!("{width}x{height} is too large")))?;
        Ok(Self {
            width,
            height,
            oversample,
            data: vec![None; len],
            depth: None,
            origin_x: 0.0,
            origin_y: 0.0,
        })
    }

    /// Builder form of [`Buffer::enable_depth`].
    pub fn with_depth(mut self) -> Self {
        self.enable_depth();
        self
    }

    /// Turn on the depth channel. Every sample starts infinitely far away.
    pub fn enable_depth(&mut self) {
        self.depth = Some(vec![f64::NEG_INFINITY; self.data.len()]);
    }

    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Set the world coordinates of the buffer's top-left corner.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin_x = x;
        self.origin_y = y;
    }

    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn oversample(&self) -> usize {
        self.oversample
    }

    /// Width of the oversampled grid.
    pub fn sample_width(&self) -> usize {
        self.width * self.oversample
    }

    /// Height of the oversampled grid.
    pub fn sample_height(&self) -> usize {
        self.height * self.oversample
    }

    #[inline]
    pub fn sample_index(&self, sx: usize, sy: usize) -> usize {
        sy * self.sample_width() + sx
    }

    /// All sub-samples, row-major over the oversampled grid.
    pub fn samples(&self) -> &[Option<Phenotype>] {
        &self.data
    }

    /// Sub-sample at oversampled coordinates, `None` if empty or outside.
    pub fn sample(&self, sx: usize, sy: usize) -> Option<&Phenotype> {
        if sx >= self.sample_width() || sy >= self.sample_height() {
            return None;
        }
        self.data[self.sample_index(sx, sy)].as_ref()
    }

    /// Stored depth at oversampled coordinates, if the channel is on.
    pub fn depth_at(&self, sx: usize, sy: usize) -> Option<f64> {
        if sx >= self.sample_width() || sy >= self.sample_height() {
            return None;
        }
        let i = self.sample_index(sx, sy);
        self.depth.as_ref().map(|d| d[i])
    }

    /// Write a sub-sample, honoring the depth test when depth is on.
    ///
    /// Larger `z` is nearer; a sample behind the stored depth is dropped.
    /// Returns whether the sample was written.
    #[inline]
    pub fn put(&mut self, index: usize, pheno: Phenotype, z: f64) -> bool {
        if let Some(depth) = self.depth.as_mut() {
            if z < depth[index] {
                return false;
            }
            depth[index] = z;
        }
        self.data[index] = Some(pheno);
        true
    }

    /// [`Buffer::put`] by oversampled coordinates. Out-of-range writes are
    /// ignored.
    pub fn set_sample(&mut self, sx: usize, sy: usize, pheno: Phenotype, z: f64) -> bool {
        if sx >= self.sample_width() || sy >= self.sample_height() {
            return false;
        }
        let i = self.sample_index(sx, sy);
        self.put(i, pheno, z)
    }

    /// Reset every sample to empty and every depth to far.
    pub fn clear(&mut self) {
        self.data.fill(None);
        if let Some(depth) = self.depth.as_mut() {
            depth.fill(f64::NEG_INFINITY);
        }
    }

    /// Phenotype of logical pixel `(x, y)`, box-filtered over its
    /// sub-samples.
    ///
    /// Sub-samples are gathered row by row into a fixed-size local array,
    /// then adjacent pairs are mixed with [`mix_phenotypes`] until a single
    /// value is left. Every merge is opacity weighted, so empty sub-samples
    /// lower the pixel's velocity without skewing its other fields, and a
    /// pixel whose samples all have zero velocity reads as empty.
    pub fn phenotype_at(&self, x: i64, y: i64) -> Option<Phenotype> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let ovs = self.oversample;
        if ovs == 1 {
            return self.data[y * self.width + x];
        }

        let mut acc = [None; MAX_PIXEL_SAMPLES];
        for sy in 0..ovs {
            let i0 = self.sample_index(x * ovs, y * ovs + sy);
            acc[sy * ovs..(sy + 1) * ovs].copy_from_slice(&self.data[i0..i0 + ovs]);
        }

        let mut len = ovs * ovs;
        while len > 1 {
            for i in 0..len / 2 {
                acc[i] = mix_phenotypes(acc[2 * i].as_ref(), acc[2 * i + 1].as_ref());
            }
            len /= 2;
        }
        acc[0]
    }
}

// ============================================================================
// Tests
// ============================================================================
