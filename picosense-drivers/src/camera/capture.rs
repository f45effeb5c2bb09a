//! Parallel video frame grabber
//!
//! Polls VSYNC, HREF and PCLK in a tight loop with no interrupts or DMA.
//! Every edge must be seen between two polls, so each loop body has to run
//! faster than the shortest high or low phase of the signal it watches.
//!
//! ```text
//! VSYNC ‾‾‾\___________________________________/‾‾‾
//! HREF  _______/‾‾‾‾‾‾‾‾\_____/‾‾‾‾‾‾‾‾\_____ ... ___
//! PCLK  _______/\/\/\/\/\_____/\/\/\/\/\_____ ... ___
//!              line 0          line 1
//! ```
//!
//! A frame starts on the VSYNC falling edge and ends when VSYNC is high
//! again. Each HREF rising edge opens a line and each PCLK rising edge
//! inside it latches one byte from the data bus.

use picosense_core::frame::{
    CaptureReport, CapturedFrame, Line, RawFrame, FRAME_LINES, LINE_BYTES,
};
use picosense_core::traits::FrameSource;
use picosense_hal::gpio::{InputPin, ParallelPort};

/// Frame grabber configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureConfig {
    /// GPIO number of data line D0; D0..D7 must be consecutive
    pub data_shift: u8,
    /// Maximum VSYNC polls while waiting for a frame (None = wait forever)
    pub frame_sync_polls: Option<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            data_shift: 9,
            frame_sync_polls: None,
        }
    }
}

/// How sampling of one line ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEnd {
    /// Exactly `LINE_BYTES` samples
    Complete,
    /// HREF fell after this many samples
    Short(usize),
    /// A sample arrived after the line was full; the line was cut off
    Overflow,
}

/// Sample one line while HREF stays high
///
/// Writes one byte per PCLK rising edge. Bytes past the last sample keep
/// whatever the buffer held before.
pub fn sample_line<H, P, B>(href: &H, pclk: &P, data: &B, shift: u8, line: &mut Line) -> LineEnd
where
    H: InputPin,
    P: InputPin,
    B: ParallelPort,
{
    let mut points = 0usize;
    let mut pclk_now = pclk.is_high();

    while href.is_high() {
        let pclk_before = pclk_now;
        pclk_now = pclk.is_high();

        if !pclk_before && pclk_now {
            let Some(slot) = line.get_mut(points) else {
                return LineEnd::Overflow;
            };
            *slot = data.read_byte(shift);
            points += 1;
        }
    }

    if points == LINE_BYTES {
        LineEnd::Complete
    } else {
        LineEnd::Short(points)
    }
}

/// Polling frame grabber owning its frame buffer
pub struct FrameGrabber<V, H, P, B> {
    vsync: V,
    href: H,
    pclk: P,
    data: B,
    config: CaptureConfig,
    frame: RawFrame,
    frame_count: u32,
}

impl<V, H, P, B> FrameGrabber<V, H, P, B>
where
    V: InputPin,
    H: InputPin,
    P: InputPin,
    B: ParallelPort,
{
    pub fn new(vsync: V, href: H, pclk: P, data: B, config: CaptureConfig) -> Self {
        Self {
            vsync,
            href,
            pclk,
            data,
            config,
            frame: RawFrame::new(),
            frame_count: 0,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Buffer contents from the most recent capture
    pub fn frame(&self) -> &RawFrame {
        &self.frame
    }

    /// Frames synchronised so far
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Capture one frame into the internal buffer
    ///
    /// Blocks until VSYNC rises again after the frame, or until the
    /// frame-sync poll budget runs out. Overflows truncate the current
    /// unit and are recorded in the report.
    pub fn capture(&mut self) -> CapturedFrame<'_> {
        let mut report = CaptureReport::default();

        if !self.wait_frame_sync() {
            #[cfg(feature = "defmt")]
            defmt::warn!("capture: no frame sync");
            report.frame_number = self.frame_count;
            return CapturedFrame {
                report,
                frame: &self.frame,
            };
        }

        self.frame_count = self.frame_count.wrapping_add(1);
        report.synced = true;
        report.frame_number = self.frame_count;

        #[cfg(feature = "defmt")]
        defmt::info!("frame number: {}", self.frame_count);

        let mut line_count = 0usize;
        let mut href_now = self.href.is_high();

        while self.vsync.is_low() {
            let href_before = href_now;
            href_now = self.href.is_high();
            if href_before || !href_now {
                continue;
            }

            line_count += 1;
            let Some(line) = self.frame.line_mut(line_count - 1) else {
                #[cfg(feature = "defmt")]
                defmt::warn!("line overflow");
                report.line_overflow = true;
                break;
            };

            match sample_line(
                &self.href,
                &self.pclk,
                &self.data,
                self.config.data_shift,
                line,
            ) {
                LineEnd::Complete => {}
                LineEnd::Short(_) => report.short_lines += 1,
                LineEnd::Overflow => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("point overflow");
                    report.point_overflows += 1;
                }
            }
        }

        report.lines = line_count.min(FRAME_LINES) as u16;

        #[cfg(feature = "defmt")]
        defmt::debug!("capture finished, {} lines", report.lines);

        CapturedFrame {
            report,
            frame: &self.frame,
        }
    }

    /// Wait for a VSYNC falling edge
    fn wait_frame_sync(&self) -> bool {
        let mut vsync_now = self.vsync.is_high();
        let mut polls = 0u32;

        loop {
            if let Some(budget) = self.config.frame_sync_polls {
                if polls >= budget {
                    return false;
                }
                polls += 1;
            }

            let vsync_before = vsync_now;
            vsync_now = self.vsync.is_high();
            if vsync_before && !vsync_now {
                return true;
            }
        }
    }

    /// Give the pins back
    pub fn release(self) -> (V, H, P, B) {
        (self.vsync, self.href, self.pclk, self.data)
    }
}

impl<V, H, P, B> FrameSource for FrameGrabber<V, H, P, B>
where
    V: InputPin,
    H: InputPin,
    P: InputPin,
    B: ParallelPort,
{
    fn capture_frame(&mut self) -> CapturedFrame<'_> {
        self.capture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use picosense_core::frame::CaptureStatus;

    const LEAD: u64 = 40;
    const GAP: u64 = 40;
    const PERIOD: u64 = 16;
    const HALF: u64 = PERIOD / 2;

    /// Periodic VSYNC/HREF/PCLK waveform; every pin read advances one tick
    struct Synth {
        t: Cell<u64>,
        lines: usize,
        points: usize,
        vsync_stuck_low: bool,
    }

    impl Synth {
        fn new(lines: usize, points: usize) -> Self {
            Self {
                t: Cell::new(0),
                lines,
                points,
                vsync_stuck_low: false,
            }
        }

        fn line_len(&self) -> u64 {
            self.points as u64 * PERIOD
        }

        fn frame_len(&self) -> u64 {
            LEAD + GAP + self.lines as u64 * (self.line_len() + GAP)
        }

        fn tick(&self) -> u64 {
            let t = self.t.get();
            self.t.set(t + 1);
            t % self.frame_len()
        }

        /// Line index and offset into it, if HREF is high at `u`
        fn in_line(&self, u: u64) -> Option<(usize, u64)> {
            let first = LEAD + GAP;
            if u < first {
                return None;
            }
            let pitch = self.line_len() + GAP;
            let line = ((u - first) / pitch) as usize;
            let offset = (u - first) % pitch;
            (line < self.lines && offset < self.line_len()).then_some((line, offset))
        }

        fn vsync(&self) -> bool {
            let u = self.tick();
            !self.vsync_stuck_low && u < LEAD
        }

        fn href(&self) -> bool {
            let u = self.tick();
            self.in_line(u).is_some()
        }

        fn pclk(&self) -> bool {
            let u = self.tick();
            matches!(self.in_line(u), Some((_, offset)) if offset % PERIOD >= HALF)
        }

        fn bus(&self) -> u32 {
            let u = self.tick();
            let value = match self.in_line(u) {
                Some((line, offset)) => pixel(line, (offset / PERIOD) as usize),
                None => 0,
            };
            // Neighbouring control pins and GPIO17 high to check masking
            ((value as u32) << 9) | (0b111 << 6) | (1 << 17)
        }
    }

    fn pixel(line: usize, column: usize) -> u8 {
        (line * 7 + column * 13) as u8
    }

    #[derive(Clone, Copy)]
    enum Signal {
        Vsync,
        Href,
        Pclk,
    }

    struct Probe<'a> {
        synth: &'a Synth,
        signal: Signal,
    }

    impl InputPin for Probe<'_> {
        fn is_high(&self) -> bool {
            match self.signal {
                Signal::Vsync => self.synth.vsync(),
                Signal::Href => self.synth.href(),
                Signal::Pclk => self.synth.pclk(),
            }
        }
    }

    struct Bus<'a>(&'a Synth);

    impl ParallelPort for Bus<'_> {
        fn read_all(&self) -> u32 {
            self.0.bus()
        }
    }

    type Grabber<'a> = FrameGrabber<Probe<'a>, Probe<'a>, Probe<'a>, Bus<'a>>;

    fn grabber(synth: &Synth, config: CaptureConfig) -> Grabber<'_> {
        let probe = |signal| Probe { synth, signal };
        FrameGrabber::new(
            probe(Signal::Vsync),
            probe(Signal::Href),
            probe(Signal::Pclk),
            Bus(synth),
            config,
        )
    }

    fn assert_lines_match(frame: &RawFrame, lines: usize, points: usize) {
        for i in 0..lines {
            for j in 0..points {
                assert_eq!(frame.get(i, j), Some(pixel(i, j)), "line {i} column {j}");
            }
        }
    }

    #[test]
    fn test_full_frame_matches_injected_bytes() {
        let synth = Synth::new(FRAME_LINES, LINE_BYTES);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        let captured = grabber.capture();
        assert_eq!(captured.report.status(), CaptureStatus::Complete);
        assert_eq!(captured.report.lines, 60);
        assert_eq!(captured.report.frame_number, 1);
        assert_eq!(captured.report.short_lines, 0);
        assert_lines_match(captured.frame, FRAME_LINES, LINE_BYTES);
    }

    #[test]
    fn test_line_overflow_keeps_first_sixty_lines() {
        let synth = Synth::new(FRAME_LINES + 1, LINE_BYTES);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        let captured = grabber.capture();
        assert!(captured.report.line_overflow);
        assert_eq!(captured.report.status(), CaptureStatus::LineOverflow);
        assert_eq!(captured.report.lines, 60);
        assert_lines_match(captured.frame, FRAME_LINES, LINE_BYTES);
    }

    #[test]
    fn test_point_overflow_truncates_each_line() {
        let synth = Synth::new(FRAME_LINES, LINE_BYTES + 10);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        let captured = grabber.capture();
        assert!(!captured.report.line_overflow);
        assert_eq!(captured.report.point_overflows, 60);
        assert_eq!(captured.report.status(), CaptureStatus::PointOverflow);
        assert_eq!(captured.report.lines, 60);
        assert_lines_match(captured.frame, FRAME_LINES, LINE_BYTES);
    }

    #[test]
    fn test_short_frame_and_short_lines() {
        let synth = Synth::new(10, 100);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        let captured = grabber.capture();
        assert_eq!(captured.report.status(), CaptureStatus::Short);
        assert_eq!(captured.report.lines, 10);
        assert_eq!(captured.report.short_lines, 10);
        assert_lines_match(captured.frame, 10, 100);
        // Untouched bytes keep their previous contents
        assert_eq!(captured.frame.get(0, 100), Some(0));
        assert_eq!(captured.frame.get(10, 0), Some(0));
    }

    #[test]
    fn test_consecutive_frames_count_up() {
        let synth = Synth::new(FRAME_LINES, LINE_BYTES);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        assert_eq!(grabber.capture().report.frame_number, 1);
        let second = grabber.capture_frame();
        assert_eq!(second.report.frame_number, 2);
        assert!(second.report.is_complete());
        assert_eq!(grabber.frame_count(), 2);
    }

    #[test]
    fn test_frame_sync_budget_gives_up() {
        let mut synth = Synth::new(FRAME_LINES, LINE_BYTES);
        synth.vsync_stuck_low = true;
        let config = CaptureConfig {
            frame_sync_polls: Some(100),
            ..Default::default()
        };
        let mut grabber = grabber(&synth, config);

        let captured = grabber.capture();
        assert!(!captured.report.synced);
        assert_eq!(captured.report.status(), CaptureStatus::NoFrameSync);
        assert_eq!(captured.report.frame_number, 0);
        assert_eq!(grabber.frame_count(), 0);
        // One initial sample plus the budget
        assert_eq!(synth.t.get(), 101);
    }

    #[test]
    fn test_ascii_of_captured_frame() {
        let synth = Synth::new(FRAME_LINES, LINE_BYTES);
        let mut grabber = grabber(&synth, CaptureConfig::default());

        let ascii = grabber.capture().to_ascii();
        // Pixel (0, 0) is luma 0
        assert_eq!(ascii.row(0).map(|r| r[0]), Some(b' '));
        let luma = pixel(3, 8);
        assert_eq!(
            ascii.row(3).map(|r| r[4]),
            Some(picosense_core::ascii::glyph(luma))
        );
    }

    #[test]
    fn test_sample_line_counts_edges() {
        let synth = Synth::new(1, 5);
        // Park the clock at the start of the line
        synth.t.set(LEAD + GAP);
        let href = Probe {
            synth: &synth,
            signal: Signal::Href,
        };
        let pclk = Probe {
            synth: &synth,
            signal: Signal::Pclk,
        };
        let mut line = [0xEEu8; LINE_BYTES];

        assert_eq!(
            sample_line(&href, &pclk, &Bus(&synth), 9, &mut line),
            LineEnd::Short(5)
        );
        assert_eq!(&line[..5], &[0, 13, 26, 39, 52]);
        assert_eq!(line[5], 0xEE);
    }
}
