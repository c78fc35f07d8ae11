//! CSS-like style strings for phenotypes.
//!
//! `velocity: 0.8; pan: 0.5; release: 0.5; pitchofs: 0; fcut: 1; fres: 0.5; color: 4`

use crate::phenotype::Phenotype;

/// Parse a style string into a phenotype.
///
/// Entries are `key: value` pairs separated by `;`. `pitchofs` and `color`
/// take integers, all other keys floats. Entries that don't parse and
/// unknown keys are skipped; missing keys keep their defaults.
pub fn parse_phenotype_from_style(style: &str) -> Phenotype {
    let mut pheno = Phenotype::default();
    for entry in style.split(';') {
        if entry.trim().is_empty() {
            continue;
        }
        if apply_entry(&mut pheno, entry).is_none() {
            tracing::trace!(entry, "ignoring style entry");
        }
    }
    pheno
}

fn apply_entry(pheno: &mut Phenotype, entry: &str) -> Option<()> {
    let mut parts = entry.split(':');
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();

    let float = || value.parse::<f64>().ok();
    let int = || value.parse::<i32>().ok().map(f64::from);

    match key {
        "velocity" => pheno.velocity = float()?,
        "pan" => pheno.pan = float()?,
        "release" => pheno.release = float()?,
        "pitchofs" => pheno.pitch_offset = int()?,
        "fcut" => pheno.fcut = float()?,
        "fres" => pheno.fres = float()?,
        "color" => pheno.color = int()?,
        _ => return None,
    }
    Some(())
}
