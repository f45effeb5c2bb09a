//! Picosense climate logger
//!
//! Reads a DHT11 on GPIO15 once a second and logs the smoothed
//! humidity and temperature over RTT.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::Pull;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use picosense_drivers::sensor::{Dht11, Dht11Config};
use picosense_firmware::board;
use picosense_firmware::tasks::climate_task;
use picosense_hal_rp2040::RpFlexPin;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Picosense climate logger starting...");

    let p = embassy_rp::init(Default::default());

    // External pull-up holds the line high while idle; the internal one helps short runs
    let data = RpFlexPin::new(p.PIN_15, Pull::Up);
    let sensor = Dht11::new(data, Delay, Dht11Config::default());
    info!("DHT11 on GPIO{}", board::DHT11_DATA);

    spawner.spawn(climate_task(sensor)).unwrap();
}
