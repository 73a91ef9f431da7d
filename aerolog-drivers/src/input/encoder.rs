//! Rotary encoder decoder
//!
//! Decodes quadrature levels into navigation events. The decoder is fed pin
//! levels by the caller, so it works with any GPIO or interrupt scheme; a
//! 1-5 ms poll is enough for a hand-turned encoder.

use aerolog_core::input::InputEvent;

/// Decoder states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature state machine with bounce rejection
///
/// CW:  A leads B: (1,1) -> (0,1) -> (0,0) -> event on the next rising edge.
/// CCW: B leads A: (1,1) -> (1,0) -> (0,0) -> event on the next rising edge.
///
/// Returning to (1,1) before both lines went low is treated as bounce.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    state: State,
    last: (bool, bool),
}

impl QuadratureDecoder {
    /// Start from the current pin levels
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: State::Idle,
            last: (a, b),
        }
    }

    /// Feed the current levels; returns an event when a detent completes
    pub fn update(&mut self, a: bool, b: bool) -> Option<InputEvent> {
        if (a, b) == self.last {
            return None;
        }
        self.last = (a, b);
        self.step(a, b)
    }

    fn step(&mut self, a: bool, b: bool) -> Option<InputEvent> {
        let (next, event) = match self.state {
            State::Idle if !a && b => (State::CwStep1, None),
            State::Idle if a && !b => (State::CcwStep1, None),
            State::Idle => (State::Idle, None),

            State::CwStep1 if !a && !b => (State::CwStep2, None),
            State::CcwStep1 if !a && !b => (State::CcwStep2, None),
            State::CwStep1 | State::CcwStep1 if a && b => (State::Idle, None),
            State::CwStep1 | State::CcwStep1 => (self.state, None),

            State::CwStep2 if a || b => (State::Idle, Some(InputEvent::EncoderCw)),
            State::CcwStep2 if a || b => (State::Idle, Some(InputEvent::EncoderCcw)),
            State::CwStep2 | State::CcwStep2 => (self.state, None),
        };
        self.state = next;
        event
    }
}
