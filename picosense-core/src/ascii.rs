//! Luma to ASCII rendering
//!
//! Used to eyeball a capture over a serial console. The index formula
//! `70 - floor(luma / 3.7)` is fixed so dumps stay comparable with
//! existing verification scripts.

use core::fmt;

use crate::frame::{RawFrame, FRAME_LINES, LUMA_COLUMNS};

/// Number of glyph levels
pub const GLYPH_LEVELS: usize = 71;

/// Density ramp, densest first, with a blank for the darkest level
///
/// Index 0 is drawn for the brightest luma. The ramp has 70 characters;
/// the final blank makes the table cover index 70 (luma 0..=3).
pub const GLYPHS: [u8; GLYPH_LEVELS] =
    *b"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'.  ";

const LAST_LEVEL: usize = GLYPH_LEVELS - 1;

/// Glyph table index for a luma value
///
/// Equal to `70 - floor(luma / 3.7)`, computed as `70 - 10 * luma / 37`
/// in integers. For every `u8` the result is in `2..=70`.
pub fn glyph_index(luma: u8) -> usize {
    let level = (luma as usize * 10) / 37;
    LAST_LEVEL - level.min(LAST_LEVEL)
}

/// Glyph at `index`, clamped to the last table entry
pub fn glyph_at(index: usize) -> u8 {
    GLYPHS[index.min(LAST_LEVEL)]
}

/// Glyph for a luma value
pub fn glyph(luma: u8) -> u8 {
    glyph_at(glyph_index(luma))
}

/// ASCII rendering of a frame's luma plane
#[derive(Clone, PartialEq, Eq)]
pub struct AsciiFrame {
    rows: [[u8; LUMA_COLUMNS]; FRAME_LINES],
}

impl fmt::Debug for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsciiFrame")
            .field("rows", &FRAME_LINES)
            .field("columns", &LUMA_COLUMNS)
            .finish()
    }
}

impl Default for AsciiFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiFrame {
    /// Blank frame
    pub const fn new() -> Self {
        Self {
            rows: [[b' '; LUMA_COLUMNS]; FRAME_LINES],
        }
    }

    pub fn from_raw(raw: &RawFrame) -> Self {
        let mut frame = Self::new();
        frame.render(raw);
        frame
    }

    /// Re-render in place from a raw frame
    pub fn render(&mut self, raw: &RawFrame) {
        for (row, line) in self.rows.iter_mut().zip(raw.lines()) {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = glyph(line[2 * x]);
            }
        }
    }

    /// Row `index` as text (no line terminator)
    pub fn line(&self, index: usize) -> Option<&str> {
        let row = self.rows.get(index)?;
        // Every glyph is ASCII
        core::str::from_utf8(row).ok()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..FRAME_LINES).filter_map(move |i| self.line(i))
    }

    /// Raw glyph bytes of row `index`
    pub fn row(&self, index: usize) -> Option<&[u8; LUMA_COLUMNS]> {
        self.rows.get(index)
    }
}

impl fmt::Display for AsciiFrame {
    /// One row per line, each terminated by `\n`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            f.write_str(line)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}
