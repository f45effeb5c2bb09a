//! OV7670 camera control over SCCB
//!
//! SCCB is driven through the generic [`I2cBus`]. A register write is a
//! two-byte `[register, value]` write. A register read is a one-byte
//! address write followed by a separate one-byte read, since the sensor
//! does not accept a repeated start.

use embedded_hal::delay::DelayNs;
use picosense_hal::i2c::I2cBus;

use super::regs::{
    self, reg, ColorFormat, FrameSize, RegisterWrite, COM7_RESET, PRODUCT_ID, PRODUCT_VERSION,
};

/// Default 7-bit SCCB address
pub const DEFAULT_ADDRESS: u8 = 0x21;

/// Settle time after a soft reset
const RESET_SETTLE_MS: u32 = 1;

/// OV7670 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ov7670Config {
    /// 7-bit bus address
    pub address: u8,
    pub size: FrameSize,
    pub format: ColorFormat,
}

impl Default for Ov7670Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            size: FrameSize::Qqqvga,
            format: ColorFormat::Yuv422,
        }
    }
}

/// OV7670 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ov7670Error<E> {
    /// Underlying bus transfer failed
    Bus(E),
    /// PID/VER registers do not identify an OV7670
    UnexpectedProductId { pid: u8, ver: u8 },
}

impl<E> From<E> for Ov7670Error<E> {
    fn from(err: E) -> Self {
        Ov7670Error::Bus(err)
    }
}

/// OV7670 driver
pub struct Ov7670<I2C> {
    bus: I2C,
    config: Ov7670Config,
}

impl<I2C: I2cBus> Ov7670<I2C> {
    pub fn new(bus: I2C, config: Ov7670Config) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &Ov7670Config {
        &self.config
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Ov7670Error<I2C::Error>> {
        self.bus.write(self.config.address, &[register, value])?;
        Ok(())
    }

    /// Read one register
    pub fn read_register(&mut self, register: u8) -> Result<u8, Ov7670Error<I2C::Error>> {
        let mut value = [0u8; 1];
        self.bus.write(self.config.address, &[register])?;
        self.bus.read(self.config.address, &mut value)?;
        Ok(value[0])
    }

    /// Write a register table in order, stopping at the first failure
    pub fn write_table(&mut self, table: &[RegisterWrite]) -> Result<(), Ov7670Error<I2C::Error>> {
        for entry in table {
            self.write_register(entry.reg, entry.value)?;
        }
        Ok(())
    }

    /// Check the product ID registers
    pub fn probe(&mut self) -> Result<(), Ov7670Error<I2C::Error>> {
        let pid = self.read_register(reg::PID)?;
        let ver = self.read_register(reg::VER)?;

        if pid != PRODUCT_ID || ver != PRODUCT_VERSION {
            #[cfg(feature = "defmt")]
            defmt::warn!("OV7670: unexpected id {=u8:#x}/{=u8:#x}", pid, ver);
            return Err(Ov7670Error::UnexpectedProductId { pid, ver });
        }
        Ok(())
    }

    /// Reset and configure the sensor for the configured size and format
    ///
    /// Any bus error aborts initialisation and is returned to the caller.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Ov7670Error<I2C::Error>> {
        self.write_register(reg::COM7, COM7_RESET)?;
        delay.delay_ms(RESET_SETTLE_MS);

        self.write_table(regs::CLOCK_SETUP)?;
        self.write_table(regs::INIT_TABLE)?;
        self.set_size(self.config.size)?;
        self.set_image_format(self.config.format)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "OV7670: configured {} {}",
            self.config.size,
            self.config.format
        );
        Ok(())
    }

    pub fn set_size(&mut self, size: FrameSize) -> Result<(), Ov7670Error<I2C::Error>> {
        self.write_table(size.table())?;
        self.config.size = size;
        Ok(())
    }

    pub fn set_image_format(&mut self, format: ColorFormat) -> Result<(), Ov7670Error<I2C::Error>> {
        self.write_table(format.table())?;
        self.config.format = format;
        Ok(())
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.bus
    }
}
