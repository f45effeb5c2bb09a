//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use picosense_hal::clock::MonotonicClock;

/// Microsecond clock from `embassy_time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_us(&self) -> u32 {
        // Truncation gives the wrapping 32-bit counter the trait expects
        Instant::now().as_micros() as u32
    }
}
