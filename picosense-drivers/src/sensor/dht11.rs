//! DHT11 humidity/temperature sensor (single-wire)
//!
//! # Wire Protocol
//!
//! The controller pulls the data line low for at least 18ms, then releases
//! it. The sensor answers with 80µs low + 80µs high, followed by 40 bits:
//!
//! - `0`: 50µs low + ~27µs high
//! - `1`: 50µs low + ~70µs high
//!
//! Bits arrive MSB first as five bytes:
//! humidity integer, humidity fraction, temperature integer,
//! temperature fraction, checksum (truncated sum of the first four).
//!
//! # Timing
//!
//! Pulse widths are measured by spinning on the pin with a 1µs busy-wait
//! per iteration, so the counts are approximate microseconds. The sensor
//! is sensitive to this; `one_threshold_us` may need tuning per board.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use picosense_core::history::ReadingHistory;
use picosense_core::reading::{ReadOutcome, Reading, StaleReason};
use picosense_core::traits::ClimateSensor;
use picosense_hal::gpio::FlexPin;

/// Upper bound on transitions recorded per response
///
/// 4 preamble edges + 2 per bit + the trailing low, rounded up.
pub const MAX_TRANSITIONS: usize = 85;

/// Payload size in bytes
pub const PAYLOAD_BYTES: usize = 5;

/// Payload size in bits
pub const PAYLOAD_BITS: usize = PAYLOAD_BYTES * 8;

/// Humidity above this after combining is treated as a corrupt fraction
const HUMIDITY_CLAMP: f32 = 100.0;

/// Temperature magnitude above this after combining is treated as a corrupt fraction
const TEMPERATURE_CLAMP: f32 = 125.0;

/// DHT11 driver configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dht11Config {
    /// Read attempts per cycle before falling back to the cached reading
    pub retries: u8,
    /// Transitions to record per response (at most [`MAX_TRANSITIONS`])
    pub max_transitions: usize,
    /// Busy-wait iterations after which a level is considered stuck
    pub timeout_count: u8,
    /// Leading transitions that belong to the sensor's response preamble
    pub preamble_transitions: usize,
    /// High-phase widths above this (µs) decode as `1`
    pub one_threshold_us: u8,
    /// Start request low time (ms, sensor needs at least 18)
    pub start_low_ms: u32,
    /// Wait after releasing the line before sampling (µs)
    pub release_us: u32,
}

impl Default for Dht11Config {
    fn default() -> Self {
        Self {
            retries: 3,
            max_transitions: MAX_TRANSITIONS,
            timeout_count: 255,
            preamble_transitions: 4,
            one_threshold_us: 30,
            start_low_ms: 20,
            release_us: 1,
        }
    }
}

/// Reasons a single read attempt is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dht11Error {
    /// The line went quiet before 40 bits were decoded
    IncompleteFrame { bits: u8 },
    /// Sum of the first four bytes does not match the fifth
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Decoded values are outside physical limits
    Implausible,
}

impl From<Dht11Error> for StaleReason {
    fn from(e: Dht11Error) -> Self {
        match e {
            Dht11Error::IncompleteFrame { .. } => StaleReason::IncompleteFrame,
            Dht11Error::ChecksumMismatch { .. } => StaleReason::ChecksumMismatch,
            Dht11Error::Implausible => StaleReason::Implausible,
        }
    }
}

/// Busy-wait counts for each observed transition of one response
#[derive(Debug, Clone, Default)]
pub struct PulseTrain {
    widths: Vec<u8, MAX_TRANSITIONS>,
    timed_out: bool,
}

impl PulseTrain {
    /// Widths in arrival order; entry `i` is the time the line held its
    /// level before transition `i`
    pub fn widths(&self) -> &[u8] {
        &self.widths
    }

    /// True if recording stopped on a stuck level rather than the
    /// transition budget
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Bits decoded from a pulse train, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPayload {
    pub bytes: [u8; PAYLOAD_BYTES],
    pub bits: u8,
}

impl RawPayload {
    /// Validate the bit count and checksum, then convert
    pub fn to_reading(&self) -> Result<Reading, Dht11Error> {
        if (self.bits as usize) < PAYLOAD_BITS {
            return Err(Dht11Error::IncompleteFrame { bits: self.bits });
        }
        decode_payload(self.bytes)
    }
}

/// Truncated sum of the four data bytes
pub fn checksum(bytes: &[u8; PAYLOAD_BYTES]) -> u8 {
    bytes[..4].iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Classify high-phase widths into payload bits
///
/// Transitions before `preamble` are the sensor's response and are
/// skipped. From there, every even-indexed transition closes the high
/// phase of one bit. Bits past the 40th are ignored.
pub fn decode_bits(widths: &[u8], preamble: usize, one_threshold_us: u8) -> RawPayload {
    let mut payload = RawPayload::default();

    for (i, &width) in widths.iter().enumerate() {
        if i < preamble || i % 2 != 0 {
            continue;
        }
        let bit = payload.bits as usize;
        if bit >= PAYLOAD_BITS {
            break;
        }

        let byte = &mut payload.bytes[bit / 8];
        *byte <<= 1;
        if width > one_threshold_us {
            *byte |= 1;
        }
        payload.bits += 1;
    }

    payload
}

/// Convert a checksummed payload into a reading
///
/// Humidity is `b0 + b1/10`, falling back to `b0` above 100.
/// Temperature is `b2 + b3/10`, falling back to `b2` above 125, and
/// negated when bit 7 of `b2` is set.
pub fn decode_payload(bytes: [u8; PAYLOAD_BYTES]) -> Result<Reading, Dht11Error> {
    let expected = checksum(&bytes);
    if expected != bytes[4] {
        return Err(Dht11Error::ChecksumMismatch {
            expected,
            actual: bytes[4],
        });
    }

    let mut humidity = bytes[0] as f32 + bytes[1] as f32 / 10.0;
    if humidity > HUMIDITY_CLAMP {
        humidity = bytes[0] as f32;
    }

    let mut temperature = bytes[2] as f32 + bytes[3] as f32 / 10.0;
    if temperature > TEMPERATURE_CLAMP {
        temperature = bytes[2] as f32;
    }
    if bytes[2] & 0x80 != 0 {
        temperature = -temperature;
    }

    Ok(Reading::new(temperature, humidity))
}

/// DHT11 driver
///
/// Owns the data pin and a busy-wait delay. Keeps the last good reading
/// and a short history for smoothing. Not reentrant: a read cycle must
/// finish before the next one starts, which `&mut self` enforces.
pub struct Dht11<P, D> {
    pin: P,
    delay: D,
    config: Dht11Config,
    cached: Reading,
    last_fresh: Option<Reading>,
    history: ReadingHistory,
}

impl<P: FlexPin, D: DelayNs> Dht11<P, D> {
    /// Create a new driver; call [`init`](Self::init) before the first read
    pub fn new(pin: P, delay: D, config: Dht11Config) -> Self {
        Self {
            pin,
            delay,
            config,
            cached: Reading::SENTINEL,
            last_fresh: None,
            history: ReadingHistory::new(),
        }
    }

    /// Release the line so the sensor idles in its ready state
    pub fn init(&mut self) {
        self.pin.set_as_input();
    }

    /// Last reading handed out (sentinel before the first success)
    pub fn cached(&self) -> Reading {
        self.cached
    }

    /// Most recent successful reading, `None` until one has happened
    pub fn last_fresh(&self) -> Option<Reading> {
        self.last_fresh
    }

    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    pub fn config(&self) -> &Dht11Config {
        &self.config
    }

    /// Give back the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    /// One full attempt: start request, capture, decode, validate
    pub fn read_once(&mut self) -> Result<Reading, Dht11Error> {
        self.send_start();
        let pulses = self.capture_pulses();
        let payload = decode_bits(
            pulses.widths(),
            self.config.preamble_transitions,
            self.config.one_threshold_us,
        );
        let reading = payload.to_reading()?;

        if !reading.is_plausible() {
            return Err(Dht11Error::Implausible);
        }
        Ok(reading)
    }

    /// Pull the line low long enough to wake the sensor, then release it
    fn send_start(&mut self) {
        self.pin.set_low();
        self.pin.set_as_output();
        self.delay.delay_ms(self.config.start_low_ms);

        self.pin.set_as_input();
        self.delay.delay_us(self.config.release_us);
    }

    /// Record how long the line holds each level
    ///
    /// Stops after `max_transitions` or when a level outlasts
    /// `timeout_count` iterations. The stuck level is not recorded.
    fn capture_pulses(&mut self) -> PulseTrain {
        let mut pulses = PulseTrain::default();
        let timeout = self.config.timeout_count.max(1);
        let mut last = true;

        for _ in 0..self.config.max_transitions.min(MAX_TRANSITIONS) {
            let mut count: u8 = 0;
            while self.pin.is_high() == last {
                count += 1;
                self.delay.delay_us(1);
                if count >= timeout {
                    break;
                }
            }

            last = self.pin.is_high();
            if count >= timeout {
                pulses.timed_out = true;
                break;
            }

            // The loop bound never exceeds the capacity
            let _ = pulses.widths.push(count);
        }

        pulses
    }
}

impl<P: FlexPin, D: DelayNs> ClimateSensor for Dht11<P, D> {
    /// Try up to `retries` times; on total failure return the cached reading
    fn read(&mut self) -> ReadOutcome {
        let mut reason = StaleReason::IncompleteFrame;

        for _attempt in 0..self.config.retries {
            match self.read_once() {
                Ok(reading) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("DHT11 read ok after {} retries", _attempt);

                    self.cached = reading;
                    self.last_fresh = Some(reading);
                    return ReadOutcome::Fresh(reading);
                }
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("DHT11 attempt {} failed: {}", _attempt, e);
                    reason = e.into();
                }
            }
        }

        ReadOutcome::Stale(self.cached, reason)
    }

    /// Read, add fresh values to the history, return the window mean
    ///
    /// The mean is never stored back; a stale cycle averages the
    /// existing window and keeps the stale tag.
    fn read_filtered(&mut self) -> ReadOutcome {
        let outcome = self.read();
        if let ReadOutcome::Fresh(reading) = outcome {
            self.history.push(reading);
        }

        match (outcome, self.history.average()) {
            (ReadOutcome::Fresh(_), Some(avg)) => ReadOutcome::Fresh(avg),
            (ReadOutcome::Stale(_, reason), Some(avg)) => ReadOutcome::Stale(avg, reason),
            (outcome, None) => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use picosense_hal::gpio::{InputPin, OutputPin, PinDirection};
    use proptest::prelude::*;
    use std::vec::Vec as StdVec;

    /// Level and duration (µs) of one waveform segment
    type Segment = (bool, u32);

    /// Busy-wait delay that advances a shared virtual clock
    struct MockDelay<'a> {
        now_us: &'a Cell<u32>,
    }

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.now_us.set(self.now_us.get() + ns.div_ceil(1000));
        }
    }

    /// Data line that replays one scripted response per start request
    ///
    /// The line idles high (pull-up) outside the script.
    struct MockLine<'a> {
        now_us: &'a Cell<u32>,
        responses: StdVec<StdVec<Segment>>,
        direction: PinDirection,
        driven_high: bool,
        low_since: Option<u32>,
        released_at: Option<u32>,
        start_pulses_us: StdVec<u32>,
        attempt: usize,
    }

    impl<'a> MockLine<'a> {
        fn new(now_us: &'a Cell<u32>, responses: StdVec<StdVec<Segment>>) -> Self {
            Self {
                now_us,
                responses,
                direction: PinDirection::Input,
                driven_high: true,
                low_since: None,
                released_at: None,
                start_pulses_us: StdVec::new(),
                attempt: 0,
            }
        }

        fn script_level(&self, elapsed: u32) -> bool {
            // attempt was already advanced on release
            let Some(script) = self.responses.get(self.attempt - 1) else {
                return true;
            };
            let mut end = 0;
            for &(level, duration) in script {
                end += duration;
                if elapsed < end {
                    return level;
                }
            }
            true
        }
    }

    impl OutputPin for MockLine<'_> {
        fn set_high(&mut self) {
            self.driven_high = true;
        }

        fn set_low(&mut self) {
            self.driven_high = false;
        }
    }

    impl InputPin for MockLine<'_> {
        fn is_high(&self) -> bool {
            match (self.direction, self.released_at) {
                (PinDirection::Output, _) => self.driven_high,
                (PinDirection::Input, None) => true,
                (PinDirection::Input, Some(at)) => self.script_level(self.now_us.get() - at),
            }
        }
    }

    impl FlexPin for MockLine<'_> {
        fn set_direction(&mut self, direction: PinDirection) {
            let now = self.now_us.get();
            match direction {
                PinDirection::Output => self.low_since = Some(now),
                PinDirection::Input => {
                    if let Some(since) = self.low_since.take() {
                        if !self.driven_high {
                            self.start_pulses_us.push(now - since);
                            self.released_at = Some(now);
                            self.attempt += 1;
                        }
                    }
                }
            }
            self.direction = direction;
        }
    }

    /// Sensor response for the given payload bytes
    fn response(bytes: [u8; 5]) -> StdVec<Segment> {
        let mut w = std::vec![(true, 20), (false, 80), (true, 80)];
        for byte in bytes {
            for bit in (0..8).rev() {
                w.push((false, 50));
                w.push((true, if (byte >> bit) & 1 == 1 { 70 } else { 26 }));
            }
        }
        w.push((false, 50));
        w
    }

    fn with_checksum(b: [u8; 4]) -> [u8; 5] {
        let sum = b.iter().fold(0u8, |s, &x| s.wrapping_add(x));
        [b[0], b[1], b[2], b[3], sum]
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn sensor<'a>(
        clock: &'a Cell<u32>,
        responses: StdVec<StdVec<Segment>>,
    ) -> Dht11<MockLine<'a>, MockDelay<'a>> {
        let mut dht = Dht11::new(
            MockLine::new(clock, responses),
            MockDelay { now_us: clock },
            Dht11Config::default(),
        );
        dht.init();
        dht
    }

    #[test]
    fn test_decode_reference_bytes() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, std::vec![response([45, 0, 23, 5, 73])]);

        let outcome = dht.read();
        assert!(outcome.is_fresh());
        let r = outcome.reading();
        assert!(approx(r.humidity, 45.0));
        assert!(approx(r.temperature, 23.5));
        assert_eq!(dht.last_fresh(), Some(r));
    }

    #[test]
    fn test_start_request_holds_line_low() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, std::vec![response([45, 0, 23, 5, 73])]);
        dht.read();

        let (pin, _) = dht.release();
        assert_eq!(pin.start_pulses_us.len(), 1);
        assert!(pin.start_pulses_us[0] >= 18_000);
        assert_eq!(pin.direction, PinDirection::Input);
    }

    #[test]
    fn test_pulse_widths_are_measured_in_microseconds() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, std::vec![response([0xFF, 0, 0, 0, 0xFF])]);
        dht.send_start();
        let pulses = dht.capture_pulses();

        // Preamble: 80µs low, 80µs high
        assert_eq!(pulses.widths()[1], 80);
        assert_eq!(pulses.widths()[2], 80);
        // First bit is a 1 (70µs high), ninth bit a 0 (26µs high)
        assert_eq!(pulses.widths()[4], 70);
        assert_eq!(pulses.widths()[4 + 2 * 8], 26);
        // Trailing low recorded, then the idle line times out
        assert_eq!(pulses.widths().len(), 84);
        assert!(pulses.timed_out());
    }

    /// Line that never settles: toggles every 40µs for far longer than a frame
    fn chatter() -> StdVec<Segment> {
        (0..200).map(|i| (i % 2 == 0, 40)).collect()
    }

    #[test]
    fn test_capture_stops_at_transition_budget() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, std::vec![chatter()]);
        dht.send_start();
        let pulses = dht.capture_pulses();

        assert_eq!(pulses.widths().len(), MAX_TRANSITIONS);
        assert!(!pulses.timed_out());
        assert!(pulses.widths()[1..].iter().all(|&w| w > 30));

        // Every high phase reads as a 1; decoding stops at 40 bits
        let payload = decode_bits(pulses.widths(), 4, 30);
        assert_eq!(payload.bits as usize, PAYLOAD_BITS);
        assert_eq!(payload.bytes, [0xFF; 5]);
        assert_eq!(
            payload.to_reading(),
            Err(Dht11Error::ChecksumMismatch {
                expected: 0xFC,
                actual: 0xFF
            })
        );
    }

    #[test]
    fn test_chattering_line_is_stale_checksum() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, std::vec![chatter(), chatter(), chatter()]);

        let outcome = dht.read();
        assert_eq!(
            outcome,
            ReadOutcome::Stale(Reading::SENTINEL, StaleReason::ChecksumMismatch)
        );
    }

    #[test]
    fn test_checksum_failure_keeps_cached_reading() {
        let clock = Cell::new(0);
        let bad = response([45, 0, 23, 5, 74]);
        let mut dht = sensor(&clock, std::vec![bad.clone(), bad.clone(), bad]);

        let outcome = dht.read();
        assert_eq!(
            outcome,
            ReadOutcome::Stale(Reading::SENTINEL, StaleReason::ChecksumMismatch)
        );
        assert_eq!(dht.cached(), Reading::SENTINEL);
        assert_eq!(dht.last_fresh(), None);
    }

    #[test]
    fn test_retry_recovers_within_cycle() {
        let clock = Cell::new(0);
        let mut dht = sensor(
            &clock,
            std::vec![response([45, 0, 23, 5, 0]), response(with_checksum([50, 0, 21, 0]))],
        );

        let outcome = dht.read();
        assert!(outcome.is_fresh());
        assert!(approx(outcome.reading().humidity, 50.0));
        assert_eq!(dht.release().0.attempt, 2);
    }

    #[test]
    fn test_retry_budget_is_three_attempts() {
        let clock = Cell::new(0);
        let bad = response([1, 2, 3, 4, 0]);
        let mut dht = sensor(
            &clock,
            std::vec![bad.clone(), bad.clone(), bad, response(with_checksum([50, 0, 21, 0]))],
        );

        assert!(!dht.read().is_fresh());
        assert_eq!(dht.release().0.attempt, 3);
    }

    #[test]
    fn test_implausible_values_are_rejected() {
        let clock = Cell::new(0);
        let hot = response(with_checksum([40, 0, 75, 0]));
        let mut dht = sensor(&clock, std::vec![hot.clone(), hot.clone(), hot]);

        let outcome = dht.read();
        assert_eq!(outcome.stale_reason(), Some(StaleReason::Implausible));
        assert_eq!(outcome.reading(), Reading::SENTINEL);
    }

    #[test]
    fn test_silent_line_is_incomplete() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, StdVec::new());

        let outcome = dht.read();
        assert_eq!(outcome.stale_reason(), Some(StaleReason::IncompleteFrame));
        assert_eq!(dht.read_once(), Err(Dht11Error::IncompleteFrame { bits: 0 }));
    }

    #[test]
    fn test_stale_cycle_returns_last_good_reading() {
        let clock = Cell::new(0);
        let bad = response([0, 0, 0, 0, 1]);
        let mut dht = sensor(
            &clock,
            std::vec![response(with_checksum([60, 0, 19, 5])), bad.clone(), bad.clone(), bad],
        );

        let first = dht.read().reading();
        let second = dht.read();
        assert!(!second.is_fresh());
        assert_eq!(second.reading(), first);
    }

    #[test]
    fn test_filtered_read_averages_fresh_readings() {
        let clock = Cell::new(0);
        let mut dht = sensor(
            &clock,
            std::vec![
                response(with_checksum([40, 0, 20, 0])),
                response(with_checksum([50, 0, 22, 0])),
            ],
        );

        let first = dht.read_filtered();
        assert!(approx(first.reading().humidity, 40.0));

        let second = dht.read_filtered();
        assert!(second.is_fresh());
        assert!(approx(second.reading().humidity, 45.0));
        assert!(approx(second.reading().temperature, 21.0));

        // Third cycle fails: the window mean is returned, tagged stale
        let third = dht.read_filtered();
        assert!(!third.is_fresh());
        assert!(approx(third.reading().humidity, 45.0));
        assert_eq!(dht.history().len(), 2);
    }

    #[test]
    fn test_filtered_before_any_success_is_sentinel() {
        let clock = Cell::new(0);
        let mut dht = sensor(&clock, StdVec::new());
        assert_eq!(dht.filtered_temperature(), 25.0);
    }

    #[test]
    fn test_extra_bits_are_ignored() {
        let mut widths = [26u8; 4 + 2 * 41];
        // 41st bit would overflow the payload
        widths[4 + 2 * 40] = 70;
        let payload = decode_bits(&widths, 4, 30);
        assert_eq!(payload.bits, 40);
        assert_eq!(payload.bytes, [0; 5]);
    }

    #[test]
    fn test_clamps_and_sign() {
        // 100.5% humidity falls back to the integer part
        let r = decode_payload(with_checksum([100, 5, 20, 0])).unwrap();
        assert!(approx(r.humidity, 100.0));

        // Sign bit set: magnitude exceeds 125 so the integer byte is used
        let r = decode_payload(with_checksum([30, 0, 0x85, 3])).unwrap();
        assert!(approx(r.temperature, -133.0));
    }

    proptest! {
        #[test]
        fn prop_valid_checksum_decodes(b0 in any::<u8>(), b1 in any::<u8>(), b2 in any::<u8>(), b3 in any::<u8>()) {
            let bytes = with_checksum([b0, b1, b2, b3]);
            let r = decode_payload(bytes).unwrap();

            let mut humidity = b0 as f32 + b1 as f32 / 10.0;
            if humidity > 100.0 {
                humidity = b0 as f32;
            }
            let mut temperature = b2 as f32 + b3 as f32 / 10.0;
            if temperature > 125.0 {
                temperature = b2 as f32;
            }
            if b2 & 0x80 != 0 {
                temperature = -temperature;
            }

            prop_assert_eq!(r.humidity, humidity);
            prop_assert_eq!(r.temperature, temperature);
        }

        #[test]
        fn prop_bad_checksum_rejected(b in any::<[u8; 4]>(), delta in 1u8..=255) {
            let mut bytes = with_checksum(b);
            bytes[4] = bytes[4].wrapping_add(delta);
            let rejected = matches!(decode_payload(bytes), Err(Dht11Error::ChecksumMismatch { .. }));
            prop_assert!(rejected);
        }

        #[test]
        fn prop_bits_round_trip_through_widths(bytes in any::<[u8; 5]>()) {
            let mut widths = std::vec![20u8, 80, 80, 50];
            for byte in bytes {
                for bit in (0..8).rev() {
                    widths.push(if (byte >> bit) & 1 == 1 { 70 } else { 26 });
                    widths.push(50);
                }
            }
            let payload = decode_bits(&widths, 4, 30);
            prop_assert_eq!(payload.bits as usize, PAYLOAD_BITS);
            prop_assert_eq!(payload.bytes, bytes);
        }
    }
}
