//! DHT11 polling task

use defmt::*;
use embassy_time::{Delay, Duration, Ticker, Timer};
use picosense_core::traits::ClimateSensor;
use picosense_core::ReadOutcome;
use picosense_drivers::sensor::Dht11;
use picosense_hal_rp2040::RpFlexPin;

/// Read interval in milliseconds
pub const READ_INTERVAL_MS: u64 = 1000;

/// Time the sensor needs after power-up before it answers
const POWER_UP_MS: u64 = 1000;

/// DHT11 bound to the RP2040 pin and embassy busy-wait delay
pub type ClimateDht = Dht11<RpFlexPin<'static>, Delay>;

/// Climate task - logs the smoothed reading once per interval
#[embassy_executor::task]
pub async fn climate_task(mut sensor: ClimateDht) {
    info!("Climate task started");

    sensor.init();
    Timer::after(Duration::from_millis(POWER_UP_MS)).await;

    let mut ticker = Ticker::every(Duration::from_millis(READ_INTERVAL_MS));

    loop {
        ticker.next().await;

        match sensor.read_filtered() {
            ReadOutcome::Fresh(r) => {
                info!(
                    "Humidity = {=f32}%, Temperature = {=f32}C",
                    r.humidity, r.temperature
                );
            }
            ReadOutcome::Stale(r, reason) => {
                warn!(
                    "Humidity = {=f32}%, Temperature = {=f32}C (stale: {})",
                    r.humidity, r.temperature, reason
                );
            }
        }

        if sensor.last_fresh().is_none() {
            debug!("No valid reading yet");
        }
    }
}
