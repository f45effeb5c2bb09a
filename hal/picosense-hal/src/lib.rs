//! Picosense Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the sensor decoders are written
//! against. Chip-specific HALs implement them; host tests implement them
//! with scripted waveforms so the timing-sensitive decoders can be
//! exercised without a board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware (picosense-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picosense-drivers (DHT11, OV7670)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picosense-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picosense-hal-rp2040                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`gpio::ParallelPort`] - Whole-bank input sampling
//! - [`i2c::I2cBus`] - I2C/SCCB bus operations
//! - [`clock::MonotonicClock`] - Microsecond timestamps for diagnostics
//!
//! Busy-wait delays use [`embedded_hal::delay::DelayNs`] directly.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use gpio::{FlexPin, InputPin, OutputPin, ParallelPort, PinDirection};
pub use i2c::I2cBus;
