//! Frame source trait

use crate::frame::CapturedFrame;

/// Trait for anything that produces raw video frames
pub trait FrameSource {
    /// Block until one frame has been captured (or abandoned)
    ///
    /// The returned frame borrows the source's internal buffer, which the
    /// next call overwrites.
    fn capture_frame(&mut self) -> CapturedFrame<'_>;
}
