//! OV7670 capture task

use defmt::*;
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker, Timer};
use picosense_core::traits::FrameSource;
use picosense_drivers::camera::{FrameGrabber, Ov7670};
use picosense_hal::MonotonicClock;
use picosense_hal_rp2040::{EmbassyClock, InputBank, RpI2c, RpInput};

/// Capture interval in milliseconds
pub const CAPTURE_INTERVAL_MS: u64 = 1000;

/// SCCB control channel
pub type Sccb = RpI2c<'static, I2C0>;

/// Data bus width
pub type CameraPins = InputBank<'static, 8>;

/// Frame grabber bound to RP2040 inputs
pub type Grabber = FrameGrabber<RpInput<'static>, RpInput<'static>, RpInput<'static>, CameraPins>;

/// Time for XCLK to settle before the sensor is configured
const XCLK_SETTLE_MS: u64 = 300;

/// Camera task - configures the sensor, then captures a frame per
/// interval and dumps it as ASCII art
///
/// XCLK must already be running when the task starts.
#[embassy_executor::task]
pub async fn camera_task(mut camera: Ov7670<Sccb>, mut grabber: Grabber) {
    info!("Camera task started");

    Timer::after(Duration::from_millis(XCLK_SETTLE_MS)).await;

    if let Err(e) = camera.probe() {
        warn!("OV7670 probe failed: {}", e);
    }
    if let Err(e) = camera.init(&mut Delay) {
        error!("OV7670 init failed: {}", e);
        return;
    }

    let clock = EmbassyClock;
    let mut ticker = Ticker::every(Duration::from_millis(CAPTURE_INTERVAL_MS));

    loop {
        ticker.next().await;

        let captured = grabber.capture_frame();
        let report = captured.report;
        if !report.is_complete() {
            warn!("Frame {}: {}", report.frame_number, report.status());
        }

        let start = clock.now_us();
        let ascii = captured.to_ascii();
        let convert_us = clock.elapsed_us(start);

        for line in ascii.lines() {
            println!("{=str}", line);
        }
        let transmit_us = clock.elapsed_us(start).wrapping_sub(convert_us);

        info!(
            "image convert time: {}us, image transmit time: {}us",
            convert_us, transmit_us
        );
        info!("capture frame finished, get {} lines", report.lines);
    }
}
