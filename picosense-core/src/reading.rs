//! Climate readings
//!
//! A [`Reading`] is what the humidity/temperature sensor produces. A read
//! cycle never fails outright: it either yields a fresh value or falls back
//! to the last good one, and [`ReadOutcome`] records which happened.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperatures at or above this are rejected (°C)
pub const MAX_PLAUSIBLE_TEMP_C: f32 = 70.0;

/// Highest accepted relative humidity (%)
pub const MAX_HUMIDITY_PCT: f32 = 100.0;

/// Temperature and relative humidity pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Temperature in °C
    pub temperature: f32,
    /// Relative humidity in %
    pub humidity: f32,
}

impl Reading {
    /// Value reported before the first successful read
    pub const SENTINEL: Self = Self {
        temperature: 25.0,
        humidity: 25.0,
    };

    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Check the reading against the physical limits of an indoor sensor
    ///
    /// Humidity must lie in (0, 100] and temperature below 70°C.
    pub fn is_plausible(&self) -> bool {
        self.temperature < MAX_PLAUSIBLE_TEMP_C
            && self.humidity > 0.0
            && self.humidity <= MAX_HUMIDITY_PCT
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::SENTINEL
    }
}

/// Why a read cycle fell back to a cached reading
///
/// Holds the failure of the last attempt in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StaleReason {
    /// Fewer than 40 bits arrived before the line went quiet
    IncompleteFrame,
    /// Payload bytes did not sum to the checksum byte
    ChecksumMismatch,
    /// Decoded values were outside physical limits
    Implausible,
}

/// Result of one read cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReadOutcome {
    /// Decoded and validated during this cycle
    Fresh(Reading),
    /// Every attempt failed; carries the last good (or sentinel) reading
    Stale(Reading, StaleReason),
}

impl ReadOutcome {
    /// The reading regardless of freshness
    pub fn reading(&self) -> Reading {
        match *self {
            ReadOutcome::Fresh(r) | ReadOutcome::Stale(r, _) => r,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, ReadOutcome::Fresh(_))
    }

    pub fn stale_reason(&self) -> Option<StaleReason> {
        match *self {
            ReadOutcome::Fresh(_) => None,
            ReadOutcome::Stale(_, reason) => Some(reason),
        }
    }

    /// Strict view: only fresh readings count
    pub fn fresh(self) -> Option<Reading> {
        match self {
            ReadOutcome::Fresh(r) => Some(r),
            ReadOutcome::Stale(..) => None,
        }
    }

    /// Strict view as a `Result`, for callers that want to propagate staleness
    pub fn into_result(self) -> Result<Reading, StaleReason> {
        match self {
            ReadOutcome::Fresh(r) => Ok(r),
            ReadOutcome::Stale(_, reason) => Err(reason),
        }
    }
}
