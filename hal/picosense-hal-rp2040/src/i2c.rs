//! Blocking I2C master for SCCB

use embassy_rp::i2c::{self, Blocking, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;
use picosense_hal::i2c::{EmbeddedI2c, I2cConfig};

/// embassy-rp blocking I2C exposed as a `picosense_hal::I2cBus`
pub type RpI2c<'d, T> = EmbeddedI2c<I2c<'d, T, Blocking>>;

/// Create a blocking bus at the configured frequency
pub fn blocking_bus<'d, T: Instance>(
    peri: Peri<'d, T>,
    scl: Peri<'d, impl SclPin<T>>,
    sda: Peri<'d, impl SdaPin<T>>,
    config: I2cConfig,
) -> RpI2c<'d, T> {
    let mut cfg = i2c::Config::default();
    cfg.frequency = config.frequency;

    #[cfg(feature = "defmt")]
    defmt::debug!("I2C: blocking bus at {} Hz", config.frequency);

    EmbeddedI2c::new(I2c::new_blocking(peri, scl, sda, cfg))
}
