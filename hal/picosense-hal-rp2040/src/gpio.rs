//! GPIO trait implementations

use embassy_rp::gpio::{Flex, Input, Pin, Pull};
use embassy_rp::{pac, Peri};
use picosense_hal::gpio::{bank_mask, FlexPin, InputPin, OutputPin, ParallelPort, PinDirection};

/// Number of user GPIOs on RP2040
pub const GPIO_COUNT: u8 = 30;

/// Pin that switches between driving and sensing
///
/// Reads always return the pad input level, which follows the driven
/// level while the pin is an output.
pub struct RpFlexPin<'d> {
    pin: Flex<'d>,
}

impl<'d> RpFlexPin<'d> {
    /// Create a flex pin, starting as an input with the given pull
    pub fn new(pin: Peri<'d, impl Pin>, pull: Pull) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(pull);
        pin.set_as_input();
        Self { pin }
    }
}

impl OutputPin for RpFlexPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

impl InputPin for RpFlexPin<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for RpFlexPin<'_> {
    fn set_direction(&mut self, direction: PinDirection) {
        match direction {
            PinDirection::Input => self.pin.set_as_input(),
            PinDirection::Output => self.pin.set_as_output(),
        }
    }
}

/// Plain input pin
pub struct RpInput<'d> {
    pin: Input<'d>,
}

impl<'d> RpInput<'d> {
    pub fn new(pin: Peri<'d, impl Pin>, pull: Pull) -> Self {
        Self {
            pin: Input::new(pin, pull),
        }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Consecutive input pins sampled together as a bank
///
/// `read_all` is a single load of the SIO input register, masked to the
/// bank, so all lines are latched in the same cycle. Pin `i` sits at bit
/// `first_gpio + i`; pins outside the bank read 0.
pub struct InputBank<'d, const N: usize> {
    // Held for their pad configuration; never read individually
    _pins: [Input<'d>; N],
    first_gpio: u8,
    mask: u32,
}

impl<'d, const N: usize> InputBank<'d, N> {
    /// Build a bank from pins wired to GPIO `first_gpio` upwards
    ///
    /// Lines that would land past the last GPIO are left out of the mask.
    pub fn new(pins: [Input<'d>; N], first_gpio: u8) -> Self {
        Self {
            _pins: pins,
            first_gpio,
            mask: bank_mask(first_gpio, N, GPIO_COUNT),
        }
    }

    pub fn first_gpio(&self) -> u8 {
        self.first_gpio
    }

    /// Bits of the SIO input register covered by this bank
    pub fn mask(&self) -> u32 {
        self.mask
    }
}

impl<const N: usize> ParallelPort for InputBank<'_, N> {
    #[inline(always)]
    fn read_all(&self) -> u32 {
        pac::SIO.gpio_in(0).read() & self.mask
    }
}
