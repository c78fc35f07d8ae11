//! Phenotypes: the interpolable material vector carried by every sample.
//!
//! A phenotype maps 1:1 onto the attributes of a piano-roll note. Velocity
//! doubles as opacity: mixing weighs every other field by velocity, and a
//! zero-velocity sample is as good as no sample at all.

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_VELOCITY: f64 = 100.0 / 128.0;
pub const DEFAULT_PAN: f64 = 0.5;
pub const DEFAULT_RELEASE: f64 = 0.5;
pub const DEFAULT_PITCH_OFFSET: f64 = 0.0;
pub const DEFAULT_FCUT: f64 = 128.0 / 255.0;
pub const DEFAULT_FRES: f64 = 128.0 / 255.0;
pub const DEFAULT_COLOR: f64 = 0.0;

// ============================================================================
// Phenotype
// ============================================================================

/// Note property vector.
///
/// `pitch_offset` and `color` are integer-valued at the edges of the
/// pipeline but stay floats in between, since interpolation blends them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phenotype {
    /// Velocity, also treated as opacity, 0.0 to 1.0.
    pub velocity: f64,
    /// Panning, 0.0 to 1.0.
    pub pan: f64,
    /// Release, 0.0 to 1.0.
    pub release: f64,
    /// Pitch offset, -120 to 120.
    pub pitch_offset: f64,
    /// Filter cutoff (mod x), 0.0 to 1.0.
    pub fcut: f64,
    /// Filter resonance (mod y), 0.0 to 1.0.
    pub fres: f64,
    /// Note color / MIDI channel, 0 to 15.
    pub color: f64,
}

impl Default for Phenotype {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
            pan: DEFAULT_PAN,
            release: DEFAULT_RELEASE,
            pitch_offset: DEFAULT_PITCH_OFFSET,
            fcut: DEFAULT_FCUT,
            fres: DEFAULT_FRES,
            color: DEFAULT_COLOR,
        }
    }
}

impl Phenotype {
    /// Default phenotype with zero velocity, i.e. fully transparent.
    pub fn transparent() -> Self {
        Self {
            velocity: 0.0,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    fn fields(&self) -> [f64; 7] {
        [
            self.velocity,
            self.pan,
            self.release,
            self.pitch_offset,
            self.fcut,
            self.fres,
            self.color,
        ]
    }

    fn from_fields(f: [f64; 7]) -> Self {
        Self {
            velocity: f[0],
            pan: f[1],
            release: f[2],
            pitch_offset: f[3],
            fcut: f[4],
            fres: f[5],
            color: f[6],
        }
    }
}

// ============================================================================
// Mixing
// ============================================================================

/// Mix two phenotypes, taking their opacity (velocity) into account.
///
/// An absent operand counts as a transparent phenotype. Every field is
/// averaged weighted by velocity, except velocity itself, which is averaged
/// plainly so partial coverage lowers the result's opacity. Returns `None`
/// when both operands are absent or the total weight is zero.
pub fn mix_phenotypes(a: Option<&Phenotype>, b: Option<&Phenotype>) -> Option<Phenotype> {
    let (a, b) = match (a, b) {
        (None, None) => return None,
        (a, b) => (
            a.copied().unwrap_or_else(Phenotype::transparent),
            b.copied().unwrap_or_else(Phenotype::transparent),
        ),
    };

    let wgt_a = a.velocity;
    let wgt_b = b.velocity;
    let wgt_tot = wgt_a + wgt_b;
    if wgt_tot == 0.0 {
        return None;
    }
    if a == b {
        return Some(a);
    }

    let mut out = [0.0; 7];
    for ((o, va), vb) in out.iter_mut().zip(a.fields()).zip(b.fields()) {
        *o = (va * wgt_a + vb * wgt_b) / wgt_tot;
    }
    out[0] = (a.velocity + b.velocity) / 2.0;
    Some(Phenotype::from_fields(out))
}

/// Weighted average of several phenotypes, ignoring their opacity.
///
/// Without `weights` every phenotype weighs 1. Missing weights count as 0,
/// absent phenotypes as transparent. Weights are normalized by their sum;
/// a zero sum yields `None`.
pub fn interpolate_phenotypes(
    phenos: &[Option<Phenotype>],
    weights: Option<&[f64]>,
) -> Option<Phenotype> {
    let weight = |i: usize| match weights {
        Some(w) => w.get(i).copied().unwrap_or(0.0),
        None => 1.0,
    };
    let wgt_tot: f64 = (0..phenos.len()).map(weight).sum();
    if wgt_tot == 0.0 {
        return None;
    }

    let mut out = [0.0; 7];
    for (i, pheno) in phenos.iter().enumerate() {
        let wgt = weight(i) / wgt_tot;
        let f = pheno.unwrap_or_else(Phenotype::transparent).fields();
        for (acc, v) in out.iter_mut().zip(f) {
            *acc += v * wgt;
        }
    }
    Some(Phenotype::from_fields(out))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn pheno(velocity: f64, pan: f64) -> Phenotype {
        Phenotype {
            velocity,
            pan,
            ..Phenotype::default()
        }
    }

    #[test]
    fn test_defaults() {
        let p = Phenotype::default();
        assert_eq!(p.velocity, 0.78125);
        assert_eq!(p.pan, 0.5);
        assert_eq!(p.pitch_offset, 0.0);
        assert_eq!(p.color, 0.0);
        assert_eq!(Phenotype::transparent().velocity, 0.0);
    }

    #[test]
    fn test_mix_both_absent() {
        assert!(mix_phenotypes(None, None).is_none());
    }

    #[test]
    fn test_mix_with_absent_zero_velocity() {
        let p = pheno(0.0, 0.3);
        assert!(mix_phenotypes(Some(&p), None).is_none());
        assert!(mix_phenotypes(None, Some(&p)).is_none());
    }

    #[test]
    fn test_mix_identical_zero_velocity_is_none() {
        let p = pheno(0.0, 0.3);
        assert!(mix_phenotypes(Some(&p), Some(&p)).is_none());
    }

    #[test]
    fn test_mix_with_absent_halves_velocity() {
        let p = pheno(0.8, 0.2);
        let m = mix_phenotypes(Some(&p), None).unwrap();
        assert!((m.velocity - 0.4).abs() < EPS);
        assert!((m.pan - 0.2).abs() < EPS);
    }

    #[test]
    fn test_mix_identical_is_exact() {
        let p = Phenotype {
            velocity: 0.1,
            pan: 0.3,
            release: 0.7,
            pitch_offset: 12.0,
            fcut: 0.9,
            fres: 0.1,
            color: 3.0,
        };
        assert_eq!(mix_phenotypes(Some(&p), Some(&p)), Some(p));
    }

    #[test]
    fn test_mix_weights_by_velocity() {
        let a = pheno(0.75, 0.0);
        let b = pheno(0.25, 1.0);
        let m = mix_phenotypes(Some(&a), Some(&b)).unwrap();
        assert!((m.pan - 0.25).abs() < EPS);
        assert!((m.velocity - 0.5).abs() < EPS);
    }

    #[test]
    fn test_interpolate_uniform() {
        let a = pheno(1.0, 0.0);
        let b = pheno(0.0, 1.0);
        let m = interpolate_phenotypes(&[Some(a), Some(b)], None).unwrap();
        assert!((m.velocity - 0.5).abs() < EPS);
        assert!((m.pan - 0.5).abs() < EPS);
    }

    #[test]
    fn test_interpolate_normalizes_weights() {
        let a = pheno(1.0, 0.0);
        let b = pheno(1.0, 1.0);
        let m = interpolate_phenotypes(&[Some(a), Some(b)], Some(&[1.0, 3.0])).unwrap();
        assert!((m.pan - 0.75).abs() < EPS);
    }

    #[test]
    fn test_interpolate_missing_weights_count_as_zero() {
        let a = pheno(1.0, 0.2);
        let b = pheno(1.0, 0.9);
        let m = interpolate_phenotypes(&[Some(a), Some(b)], Some(&[2.0])).unwrap();
        assert!((m.pan - 0.2).abs() < EPS);
    }

    #[test]
    fn test_interpolate_zero_weights_is_none() {
        let a = pheno(1.0, 0.2);
        assert!(interpolate_phenotypes(&[Some(a)], Some(&[0.0])).is_none());
        assert!(interpolate_phenotypes(&[], None).is_none());
    }

    #[test]
    fn test_interpolate_absent_is_transparent() {
        let a = pheno(1.0, 0.5);
        let m = interpolate_phenotypes(&[Some(a), None], None).unwrap();
        assert!((m.velocity - 0.5).abs() < EPS);
        assert!((m.pan - 0.5).abs() < EPS);
    }

    #[test]
    fn test_serde_fills_defaults() {
        let p: Phenotype = serde_json::from_str(r#"{"velocity": 1.0, "color": 4}"#).unwrap();
        assert_eq!(p.velocity, 1.0);
        assert_eq!(p.color, 4.0);
        assert_eq!(p.pan, DEFAULT_PAN);
    }
}
