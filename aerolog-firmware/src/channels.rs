//! Inter-task communication
//!
//! Input events flow from the encoder and button tasks to the monitor task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use aerolog_core::input::{DebounceGate, InputEvent};

/// Channel capacity for input events
const INPUT_CHANNEL_SIZE: usize = 8;

/// Encoder rotation and button presses
pub static INPUT_CHANNEL: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_SIZE> =
    Channel::new();

/// Button debounce gate, re-armed by the debounce task
pub static DEBOUNCE_GATE: DebounceGate = DebounceGate::new();
