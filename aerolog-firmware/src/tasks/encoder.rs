//! Rotary encoder task

use defmt::*;
use embassy_stm32::gpio::Input;
use embassy_time::Timer;

use aerolog_drivers::input::encoder::QuadratureDecoder;

use crate::channels::INPUT_CHANNEL;

/// Pin poll period
const POLL_MS: u64 = 2;

/// Polls the encoder lines and queues a cursor event per detent
#[embassy_executor::task]
pub async fn encoder_task(a: Input<'static>, b: Input<'static>) {
    info!("Encoder task started");

    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());

    loop {
        if let Some(event) = decoder.update(a.is_high(), b.is_high()) {
            debug!("Encoder: {}", event);
            if INPUT_CHANNEL.try_send(event).is_err() {
                warn!("Input queue full, dropping {}", event);
            }
        }

        Timer::after_millis(POLL_MS).await;
    }
}
