//! User input model

use portable_atomic::{AtomicBool, Ordering};

/// Input code that moves the chart cursor one column back
pub const CURSOR_BACK: u8 = 1;

/// Input code that moves the chart cursor one column forward
pub const CURSOR_FORWARD: u8 = 2;

/// Input events from the encoder and button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Encoder rotated clockwise
    EncoderCw,
    /// Encoder rotated counter-clockwise
    EncoderCcw,
    /// Button pressed
    ButtonPress,
}

impl InputEvent {
    /// Screen input code, or `None` for the screen-advance event
    pub fn code(self) -> Option<u8> {
        match self {
            InputEvent::EncoderCw => Some(CURSOR_FORWARD),
            InputEvent::EncoderCcw => Some(CURSOR_BACK),
            InputEvent::ButtonPress => None,
        }
    }
}

/// Software debounce gate
///
/// An input source calls [`try_pass`](Self::try_pass) on each edge; only the
/// first edge after the gate was armed gets through. A free-running timer
/// re-arms the gate once per debounce period. Safe to share between an
/// interrupt-driven task and the timer task.
#[derive(Debug)]
pub struct DebounceGate {
    armed: AtomicBool,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceGate {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(true),
        }
    }

    /// Consume the gate; returns whether this edge should be delivered
    pub fn try_pass(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }

    /// Re-open the gate for the next edge
    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }
}
