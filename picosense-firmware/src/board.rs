//! Board pin map (Raspberry Pi Pico)
//!
//! Peripheral tokens are still taken by name in the binaries; these
//! numbers are what the drivers and log lines need.

/// DHT11 data line (needs a 10k pull-up)
pub const DHT11_DATA: u8 = 15;

/// OV7670 SCCB data
pub const OV7670_SDA: u8 = 4;
/// OV7670 SCCB clock
pub const OV7670_SCL: u8 = 5;
/// Frame sync
pub const OV7670_VSYNC: u8 = 6;
/// Line valid
pub const OV7670_HREF: u8 = 7;
/// Pixel clock
pub const OV7670_PCLK: u8 = 8;
/// Data bus D0; D1..D7 follow on GPIO 10..16
pub const OV7670_D0: u8 = 9;
/// Camera master clock output
pub const OV7670_XCLK: u8 = 21;

/// XCLK = system clock / this divider (125 MHz / 10 = 12.5 MHz)
pub const XCLK_DIVIDER: u32 = 10;
