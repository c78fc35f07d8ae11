//! Buffer to piano-roll note conversion.
//!
//! Each non-empty logical pixel becomes one note: the column gives the
//! start time, the row gives the note number, and the pixel's phenotype
//! supplies every other attribute.

use serde::{Deserialize, Serialize};

use crate::basics::iround;
use crate::buffer::Buffer;

/// Ticks per quarter note.
pub const PPQ: u32 = 96;

/// Default note length per pixel: a sixteenth.
pub const DEFAULT_PIXEL_WIDTH: u32 = PPQ / 4;

/// Number of addressable note numbers; rows map to `0..NOTE_COUNT`.
pub const NOTE_COUNT: i64 = 131;

/// One note on the piano roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Start in ticks.
    pub time: i64,
    pub number: u8,
    /// Length in ticks.
    pub length: u32,
    pub velocity: f64,
    pub pan: f64,
    pub release: f64,
    pub pitch_offset: i32,
    pub fcut: f64,
    pub fres: f64,
    pub color: i32,
}

/// Render `buffer` into notes.
///
/// Pixel `(ix, iy)` lands at column `x_offset + ix` and note number
/// `y_offset + iy`. Pixels with a negative column or a note number outside
/// `0..NOTE_COUNT` are skipped, as are columns whose start time does not
/// fit in an `i64`. Interpolated pitch offsets are truncated and colors
/// rounded.
#[tracing::instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn render_notes(buffer: &Buffer, x_offset: i64, y_offset: i64, pixel_width: u32) -> Vec<NoteEvent> {
    let mut notes = Vec::new();
    for iy in 0..buffer.height() as i64 {
        let Some(number) = y_offset.checked_add(iy) else {
            continue;
        };
        if !(0..NOTE_COUNT).contains(&number) {
            continue;
        }
        for ix in 0..buffer.width() as i64 {
            let Some(time) = x_offset
                .checked_add(ix)
                .filter(|x| *x >= 0)
                .and_then(|x| x.checked_mul(i64::from(pixel_width)))
            else {
                continue;
            };
            let Some(pheno) = buffer.phenotype_at(ix, iy) else {
                continue;
            };
            notes.push(NoteEvent {
                time,
                number: number as u8,
                length: pixel_width,
                velocity: pheno.velocity,
                pan: pheno.pan,
                release: pheno.release,
                pitch_offset: pheno.pitch_offset.trunc() as i32,
                fcut: pheno.fcut,
                fres: pheno.fres,
                color: iround(pheno.color) as i32,
            });
        }
    }
    tracing::debug!(notes = notes.len(), "rendered notes");
    notes
}
