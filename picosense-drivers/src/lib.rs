//! Hardware driver implementations
//!
//! This crate provides the protocol decoders behind the traits defined
//! in picosense-core, generic over the picosense-hal traits:
//!
//! - DHT11 humidity/temperature sensor (single-wire pulse-width protocol)
//! - OV7670 camera register control (SCCB)
//! - Parallel video frame grabber (VSYNC/HREF/PCLK polling)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod camera;
pub mod sensor;
