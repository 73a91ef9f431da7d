//! Screens
//!
//! The monitor shows one of two screens at a time. Both draw from the same
//! [`View`] of the shared state and write straight to the transport.

mod chart_screen;
mod main_screen;

pub use chart_screen::ChartScreen;
pub use main_screen::MainScreen;

use crate::sensor::Readings;
use crate::store::SampleStore;
use crate::transport::{DisplayError, PageTransport};

/// Shared state a screen renders
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub readings: &'a Readings,
    pub store: &'a SampleStore,
}

/// Which screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenKind {
    /// Large live readings
    Main,
    /// Trend chart with cursor
    #[default]
    Chart,
}

impl ScreenKind {
    /// Position in the screen table
    pub const fn index(self) -> usize {
        match self {
            ScreenKind::Main => 0,
            ScreenKind::Chart => 1,
        }
    }

    /// The screen after this one
    pub const fn next(self) -> Self {
        match self {
            ScreenKind::Main => ScreenKind::Chart,
            ScreenKind::Chart => ScreenKind::Main,
        }
    }
}

/// A screen
pub enum Screen {
    Main(MainScreen),
    Chart(ChartScreen),
}

impl Screen {
    /// Build the screen table, indexed by [`ScreenKind::index`]
    pub fn table() -> [Screen; 2] {
        [
            Screen::Main(MainScreen::new()),
            Screen::Chart(ChartScreen::new()),
        ]
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Main(_) => ScreenKind::Main,
            Screen::Chart(_) => ScreenKind::Chart,
        }
    }

    /// Render the screen
    ///
    /// With `force` unset, screens that track what is on the panel only
    /// redraw what changed.
    pub fn draw<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        view: View<'_>,
        force: bool,
    ) -> Result<(), DisplayError> {
        match self {
            Screen::Main(screen) => screen.draw(transport, view, force),
            Screen::Chart(screen) => screen.draw(transport, view, force),
        }
    }

    /// Deliver an input code
    pub fn input(&mut self, code: u8) {
        match self {
            Screen::Main(screen) => screen.input(code),
            Screen::Chart(screen) => screen.input(code),
        }
    }

    /// Whether input changed what the screen should show
    pub fn need_redraw(&mut self) -> bool {
        match self {
            Screen::Main(screen) => screen.need_redraw(),
            Screen::Chart(screen) => screen.need_redraw(),
        }
    }
}
