//! Picosense firmware support
//!
//! Board wiring and the embassy tasks shared by the `climate` and
//! `camera` binaries. The two binaries target different wiring (the
//! DHT11 data line sits on a pin the camera bus also uses), so each one
//! spawns only its own task.

#![no_std]

pub mod board;
pub mod tasks;
