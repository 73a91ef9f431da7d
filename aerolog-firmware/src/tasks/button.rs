//! Push button task

use defmt::*;
use embassy_stm32::exti::ExtiInput;

use aerolog_core::input::InputEvent;

use crate::channels::{DEBOUNCE_GATE, INPUT_CHANNEL};

/// Queues a screen switch per press
///
/// Edges arriving while the debounce gate is closed are contact bounce.
#[embassy_executor::task]
pub async fn button_task(mut button: ExtiInput<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;

        if !DEBOUNCE_GATE.try_pass() {
            continue;
        }

        debug!("Button pressed");
        if INPUT_CHANNEL.try_send(InputEvent::ButtonPress).is_err() {
            warn!("Input queue full, dropping button press");
        }
    }
}
