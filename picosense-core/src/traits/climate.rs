//! Humidity/temperature sensor trait

use crate::reading::ReadOutcome;

/// Trait for combined humidity/temperature sensors
///
/// A read never fails: when the sensor cannot be decoded the driver
/// returns its cached value tagged as stale.
pub trait ClimateSensor {
    /// Run one read cycle (including internal retries)
    fn read(&mut self) -> ReadOutcome;

    /// Run one read cycle and return the rolling average
    fn read_filtered(&mut self) -> ReadOutcome;

    /// Temperature in °C from a fresh read cycle
    fn temperature(&mut self) -> f32 {
        self.read().reading().temperature
    }

    /// Relative humidity in % from a fresh read cycle
    fn humidity(&mut self) -> f32 {
        self.read().reading().humidity
    }

    /// Smoothed temperature in °C
    fn filtered_temperature(&mut self) -> f32 {
        self.read_filtered().reading().temperature
    }

    /// Smoothed relative humidity in %
    fn filtered_humidity(&mut self) -> f32 {
        self.read_filtered().reading().humidity
    }
}
