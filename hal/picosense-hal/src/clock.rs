//! Monotonic time source
//!
//! Used for diagnostic timing only (e.g. how long an ASCII conversion
//! took). Protocol decoding never depends on it; the decoders count
//! busy-wait iterations instead.

/// Free-running microsecond counter
pub trait MonotonicClock {
    /// Current time in microseconds (wraps at `u32::MAX`)
    fn now_us(&self) -> u32;

    /// Microseconds elapsed since `start`, tolerant of one wrap-around
    fn elapsed_us(&self, start: u32) -> u32 {
        self.now_us().wrapping_sub(start)
    }
}
