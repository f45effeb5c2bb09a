//! Board-agnostic core types for the sensor decoders
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Climate readings, freshness tagging and plausibility limits
//! - Rolling reading history for smoothing
//! - Raw video frame buffer and capture reports
//! - Luma-to-ASCII rendering used to verify captures
//! - Sensor traits implemented by the drivers

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod ascii;
pub mod frame;
pub mod history;
pub mod reading;
pub mod traits;

pub use ascii::AsciiFrame;
pub use frame::{CaptureReport, CaptureStatus, CapturedFrame, RawFrame};
pub use history::ReadingHistory;
pub use reading::{ReadOutcome, Reading, StaleReason};
