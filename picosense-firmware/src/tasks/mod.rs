//! Embassy tasks
//!
//! Each task owns its driver and polls it on a ticker. Reads and
//! captures themselves are blocking busy-wait loops.

pub mod camera;
pub mod climate;

pub use camera::{camera_task, CameraPins, Grabber, Sccb};
pub use climate::{climate_task, ClimateDht};
