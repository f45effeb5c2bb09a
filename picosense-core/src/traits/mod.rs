//! Sensor traits
//!
//! These traits define the interface between the decoders and whatever
//! consumes their output (display, serial forwarding, tests).

pub mod camera;
pub mod climate;

pub use camera::FrameSource;
pub use climate::ClimateSensor;
