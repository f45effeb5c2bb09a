//! Raw video frame buffer and capture bookkeeping
//!
//! The camera streams YUV422 with bytes ordered `Y U Y V ...`, so a
//! 80-pixel line occupies 160 bytes and luma lives in the even columns.

use crate::ascii::AsciiFrame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lines per frame (QQQVGA height)
pub const FRAME_LINES: usize = 60;

/// Bytes per line (80 pixels × 2 bytes)
pub const LINE_BYTES: usize = 160;

/// Luma samples per line
pub const LUMA_COLUMNS: usize = LINE_BYTES / 2;

/// One line of interleaved samples
pub type Line = [u8; LINE_BYTES];

/// Fixed-size frame buffer, overwritten in place by each capture
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    lines: [Line; FRAME_LINES],
}

impl core::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawFrame")
            .field("lines", &FRAME_LINES)
            .field("line_bytes", &LINE_BYTES)
            .finish()
    }
}

impl Default for RawFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RawFrame {
    /// Create a zero-filled frame
    pub const fn new() -> Self {
        Self::filled(0)
    }

    /// Create a frame with every byte set to `byte`
    pub const fn filled(byte: u8) -> Self {
        Self {
            lines: [[byte; LINE_BYTES]; FRAME_LINES],
        }
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Byte at `(line, column)`
    pub fn get(&self, line: usize, column: usize) -> Option<u8> {
        self.lines.get(line)?.get(column).copied()
    }

    /// Luma of pixel `x` on `line` (the even byte of each Y/chroma pair)
    pub fn luma(&self, line: usize, x: usize) -> Option<u8> {
        if x >= LUMA_COLUMNS {
            return None;
        }
        self.get(line, 2 * x)
    }
}

/// How a capture ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CaptureStatus {
    /// Exactly `FRAME_LINES` full lines captured
    Complete,
    /// Frame ended before `FRAME_LINES` lines arrived
    Short,
    /// A line-valid edge arrived after the buffer was full
    LineOverflow,
    /// At least one line carried more than `LINE_BYTES` samples
    PointOverflow,
    /// No vertical sync falling edge within the poll budget
    NoFrameSync,
}

/// Bookkeeping for one capture pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureReport {
    /// Running frame counter (first frame is 1)
    pub frame_number: u32,
    /// Lines written into the buffer
    pub lines: u16,
    /// Set when a line arrived after the buffer was full
    pub line_overflow: bool,
    /// Lines that were cut off at `LINE_BYTES`
    pub point_overflows: u16,
    /// Lines that ended with fewer than `LINE_BYTES` samples
    pub short_lines: u16,
    /// False when the frame-sync wait gave up
    pub synced: bool,
}

impl CaptureReport {
    pub fn status(&self) -> CaptureStatus {
        if !self.synced {
            CaptureStatus::NoFrameSync
        } else if self.line_overflow {
            CaptureStatus::LineOverflow
        } else if self.point_overflows > 0 {
            CaptureStatus::PointOverflow
        } else if (self.lines as usize) < FRAME_LINES {
            CaptureStatus::Short
        } else {
            CaptureStatus::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == CaptureStatus::Complete
    }
}

/// A finished capture: the report plus a borrow of the decoder's buffer
#[derive(Debug, Clone, Copy)]
pub struct CapturedFrame<'a> {
    pub report: CaptureReport,
    pub frame: &'a RawFrame,
}

impl<'a> CapturedFrame<'a> {
    /// Render the luma plane as ASCII art
    pub fn to_ascii(&self) -> AsciiFrame {
        AsciiFrame::from_raw(self.frame)
    }
}
