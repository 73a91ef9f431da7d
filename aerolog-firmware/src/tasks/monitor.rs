//! Monitor task
//!
//! Owns the [`Monitor`], the display and the sensors. Each iteration either
//! polls the sensors on the ticker or applies queued input, then lets the
//! monitor redraw whatever changed.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_stm32::i2c::{I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_time::{Duration, Ticker};

use aerolog_core::Monitor;
use aerolog_drivers::display::Ssd1306;

use crate::channels::INPUT_CHANNEL;
use crate::sensors::Sensors;

pub type Display = Ssd1306<I2c<'static, Blocking, Master>>;

#[embassy_executor::task]
pub async fn monitor_task(mut monitor: Monitor, mut display: Display, mut sensors: Sensors) {
    info!("Monitor task started");

    if let Err(e) = monitor.start(&mut display) {
        error!("Initial draw failed: {}", e);
    }

    let interval = Duration::from_millis(monitor.config().poll_interval_ms as u64);
    let mut ticker = Ticker::every(interval);

    loop {
        match select(ticker.next(), INPUT_CHANNEL.receive()).await {
            Either::First(()) => {
                let readings = sensors.poll().await;
                monitor.record(readings);
            }
            Either::Second(event) => {
                monitor.handle_input(event);
                // Apply a burst of encoder steps before redrawing once
                while let Ok(event) = INPUT_CHANNEL.try_receive() {
                    monitor.handle_input(event);
                }
            }
        }

        match monitor.render(&mut display) {
            Ok(true) => trace!("Redrawn {}", monitor.active()),
            Ok(false) => {}
            Err(e) => warn!("Display update failed: {}", e),
        }
    }
}
