//! Rolling reading history
//!
//! Keeps the most recent readings in a fixed-capacity FIFO and averages
//! them. The average is computed on demand and never written back.

use heapless::Deque;

use crate::reading::Reading;

/// Number of readings kept for smoothing
pub const HISTORY_DEPTH: usize = 5;

/// Bounded FIFO of readings; the oldest entry is evicted when full
#[derive(Debug, Clone)]
pub struct ReadingHistory<const N: usize = HISTORY_DEPTH> {
    readings: Deque<Reading, N>,
}

impl<const N: usize> Default for ReadingHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadingHistory<N> {
    pub const fn new() -> Self {
        Self {
            readings: Deque::new(),
        }
    }

    /// Append a reading, evicting the oldest one if the window is full
    pub fn push(&mut self, reading: Reading) {
        if self.readings.is_full() {
            self.readings.pop_front();
        }
        // A slot was freed above, so this only fails for N == 0
        let _ = self.readings.push_back(reading);
    }

    /// Arithmetic mean of temperature and humidity over the window
    ///
    /// Returns `None` while the history is empty.
    pub fn average(&self) -> Option<Reading> {
        if self.readings.is_empty() {
            return None;
        }

        let (temp_sum, humidity_sum) = self
            .readings
            .iter()
            .fold((0.0f32, 0.0f32), |(t, h), r| (t + r.temperature, h + r.humidity));
        let count = self.readings.len() as f32;

        Some(Reading::new(temp_sum / count, humidity_sum / count))
    }

    /// Most recent reading in the window
    pub fn latest(&self) -> Option<Reading> {
        self.readings.back().copied()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Readings from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_empty_history_has_no_average() {
        let history: ReadingHistory = ReadingHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.average(), None);
    }

    #[test]
    fn test_average_of_full_window() {
        let mut history: ReadingHistory = ReadingHistory::new();
        for i in 1..=5 {
            history.push(Reading::new(20.0 + i as f32, 40.0 + i as f32));
        }

        let avg = history.average().unwrap();
        assert!(approx(avg.temperature, 23.0));
        assert!(approx(avg.humidity, 43.0));
    }

    #[test]
    fn test_sixth_push_evicts_oldest() {
        let mut history: ReadingHistory = ReadingHistory::new();
        for i in 1..=5 {
            history.push(Reading::new(i as f32, 10.0 * i as f32));
        }

        // R6 evicts R1: mean(2..=6) = 4
        history.push(Reading::new(6.0, 60.0));
        let avg = history.average().unwrap();
        assert_eq!(history.len(), HISTORY_DEPTH);
        assert!(approx(avg.temperature, 4.0));
        assert!(approx(avg.humidity, 40.0));
        assert_eq!(history.iter().next().unwrap().temperature, 2.0);
        assert_eq!(history.latest().unwrap().temperature, 6.0);
    }

    #[test]
    fn test_partial_window() {
        let mut history: ReadingHistory = ReadingHistory::new();
        history.push(Reading::new(20.0, 50.0));
        history.push(Reading::new(22.0, 54.0));

        let avg = history.average().unwrap();
        assert!(approx(avg.temperature, 21.0));
        assert!(approx(avg.humidity, 52.0));

        history.clear();
        assert!(history.is_empty());
    }
}
