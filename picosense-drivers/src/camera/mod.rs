//! OV7670 camera: SCCB register control and parallel frame capture

pub mod capture;
pub mod ov7670;
pub mod regs;

pub use capture::{CaptureConfig, FrameGrabber, LineEnd};
pub use ov7670::{Ov7670, Ov7670Config, Ov7670Error};
pub use regs::{ColorFormat, FrameSize};
