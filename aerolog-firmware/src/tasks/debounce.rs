//! Debounce timer task
//!
//! Free-running: re-arms the button gate once per period, so at most one
//! press passes per period.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::channels::DEBOUNCE_GATE;

#[embassy_executor::task]
pub async fn debounce_task(period_ms: u32) {
    info!("Debounce task started ({} ms)", period_ms);

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));

    loop {
        ticker.next().await;
        DEBOUNCE_GATE.arm();
    }
}
