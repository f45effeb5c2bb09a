//! Picosense ASCII camera
//!
//! Drives an OV7670 at 80x60 YUV422, captures a frame once a second by
//! polling the parallel bus and dumps its luma as ASCII art over RTT.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::clocks::{Gpout, GpoutSrc};
use embassy_rp::gpio::{Input, Pull};
use {defmt_rtt as _, panic_probe as _};

use picosense_drivers::camera::{CaptureConfig, FrameGrabber, Ov7670, Ov7670Config};
use picosense_firmware::board;
use picosense_firmware::tasks::camera_task;
use picosense_hal::i2c::I2cConfig;
use picosense_hal_rp2040::{blocking_bus, InputBank, RpInput};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Picosense camera starting...");

    let p = embassy_rp::init(Default::default());

    // Master clock for the sensor
    let xclk = Gpout::new(p.PIN_21);
    xclk.set_src(GpoutSrc::Sys);
    xclk.set_div(board::XCLK_DIVIDER, 0);
    xclk.enable();
    info!("XCLK on GPIO{}: sys / {}", board::OV7670_XCLK, board::XCLK_DIVIDER);

    // SCCB control channel
    let i2c = blocking_bus(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        I2cConfig::STANDARD,
    );
    let camera = Ov7670::new(i2c, Ov7670Config::default());

    // Parallel video bus
    let vsync = RpInput::new(p.PIN_6, Pull::None);
    let href = RpInput::new(p.PIN_7, Pull::None);
    let pclk = RpInput::new(p.PIN_8, Pull::None);
    let data = InputBank::new(
        [
            Input::new(p.PIN_9, Pull::None),
            Input::new(p.PIN_10, Pull::None),
            Input::new(p.PIN_11, Pull::None),
            Input::new(p.PIN_12, Pull::None),
            Input::new(p.PIN_13, Pull::None),
            Input::new(p.PIN_14, Pull::None),
            Input::new(p.PIN_15, Pull::None),
            Input::new(p.PIN_16, Pull::None),
        ],
        board::OV7670_D0,
    );
    let grabber = FrameGrabber::new(
        vsync,
        href,
        pclk,
        data,
        CaptureConfig {
            data_shift: board::OV7670_D0,
            ..Default::default()
        },
    );

    spawner.spawn(camera_task(camera, grabber)).unwrap();

    // XCLK must keep running for as long as the camera does
    core::future::pending::<()>().await;
    drop(xclk);
}
