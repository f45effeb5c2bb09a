//! GPIO pin abstractions
//!
//! Provides traits for digital pins that can be implemented by
//! chip-specific HALs. Reads take `&self` so that several pins backed by
//! the same register bank can be polled from one loop.

/// Direction of a pin that can switch between driving and sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinDirection {
    Input,
    Output,
}

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction is switched at runtime
///
/// Half-duplex buses (e.g. the DHT11 data line) are driven by the
/// controller for the start request, then released to the sensor.
/// Reading an output-configured pin returns the driven level.
pub trait FlexPin: OutputPin + InputPin {
    /// Switch the pin direction
    fn set_direction(&mut self, direction: PinDirection);

    /// Switch to input, releasing the line to the pull-up
    fn set_as_input(&mut self) {
        self.set_direction(PinDirection::Input);
    }

    /// Switch to output
    fn set_as_output(&mut self) {
        self.set_direction(PinDirection::Output);
    }
}

/// A bank of input pins sampled in a single read
///
/// Bit `n` of the returned mask is the level of GPIO `n`. Used to latch a
/// parallel data bus in one operation so all lines are sampled together.
pub trait ParallelPort {
    /// Read the level of every pin in the bank
    fn read_all(&self) -> u32;

    /// Extract an 8-bit bus whose least significant line is GPIO `shift`
    fn read_byte(&self, shift: u8) -> u8 {
        ((self.read_all() >> shift) & 0xFF) as u8
    }
}

/// Mask of `len` consecutive GPIOs starting at `first`
///
/// Lines at or past `gpio_count` are left out.
pub const fn bank_mask(first: u8, len: usize, gpio_count: u8) -> u32 {
    let mut mask = 0u32;
    let mut gpio = first as usize;
    while gpio < first as usize + len && gpio < gpio_count as usize && gpio < 32 {
        mask |= 1 << gpio;
        gpio += 1;
    }
    mask
}
