//! RP2040-specific HAL for the Picosense firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `picosense-hal` traits on top of `embassy-rp`:
//!
//! - Direction-switching pin for the DHT11 data line
//! - Input pins and an 8-bit input bank for the camera bus
//! - Blocking I2C master for SCCB
//! - Monotonic microsecond clock from `embassy-time`
//!
//! Busy-wait delays come from [`embassy_time::Delay`], which already
//! implements `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod i2c;

pub use clock::EmbassyClock;
pub use gpio::{InputBank, RpFlexPin, RpInput};
pub use i2c::{blocking_bus, RpI2c};
