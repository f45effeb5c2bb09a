//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by chip-specific HALs. SCCB (the camera control bus) is wire-compatible
//! with I2C for single-register writes and split write/read transactions.

/// I2C bus master
///
/// All operations are blocking and perform no retry. There is no
/// combined write-read: SCCB devices do not understand repeated start,
/// so register reads are a [`write`](Self::write) then a
/// [`read`](Self::read).
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl I2cConfig {
    /// Standard mode (100 kHz), the SCCB maximum
    pub const STANDARD: Self = Self { frequency: 100_000 };
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Adapter exposing any `embedded-hal` 1.0 blocking I2C master as an [`I2cBus`]
pub struct EmbeddedI2c<T>(pub T);

impl<T> EmbeddedI2c<T> {
    /// Wrap an `embedded-hal` I2C master
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Recover the wrapped bus
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for EmbeddedI2c<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }
}
