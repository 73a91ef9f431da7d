//! Monitor main loop logic
//!
//! Owns the shared readings, the sample store and both screens. The firmware
//! drives it once per poll: read sensors, [`record`](Monitor::record) the raw
//! readings, deliver queued input, then [`render`](Monitor::render).

use crate::config::MonitorConfig;
use crate::filter::{MovingAverage, FILTER_WINDOW};
use crate::input::InputEvent;
use crate::screen::{Screen, ScreenKind, View};
use crate::sensor::Readings;
use crate::store::{Channel, SampleStore};
use crate::transport::{DisplayError, PageTransport};

/// Smoothing filters for the logged quantities
#[derive(Debug, Clone, Default)]
struct Filters {
    co2: MovingAverage<FILTER_WINDOW>,
    temperature: MovingAverage<FILTER_WINDOW>,
    humidity: MovingAverage<FILTER_WINDOW>,
}

impl Filters {
    /// Smooth `raw`; missing values stay missing and are not averaged in
    fn apply(&mut self, raw: Readings) -> Readings {
        Readings {
            co2_ppm: raw
                .co2_ppm
                .map(|v| self.co2.push(v as i32) as u16),
            temperature_x10: raw
                .temperature_x10
                .map(|v| self.temperature.push(v as i32) as i16),
            humidity_x10: raw
                .humidity_x10
                .map(|v| self.humidity.push(v as i32) as u16),
            supply_mv: raw.supply_mv,
        }
    }
}

pub struct Monitor {
    config: MonitorConfig,
    store: SampleStore,
    filters: Filters,
    readings: Readings,
    screens: [Screen; 2],
    active: ScreenKind,
    switch_pending: bool,
    /// Polls since the last logged sample
    polls: u16,
    readings_dirty: bool,
    log_dirty: bool,
}

impl Monitor {
    /// Build the monitor; allocates the glyph printers of both screens
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            store: SampleStore::new(),
            filters: Filters::default(),
            readings: Readings::default(),
            screens: Screen::table(),
            active: config.start_screen,
            switch_pending: false,
            polls: 0,
            readings_dirty: false,
            log_dirty: false,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Smoothed readings from the last poll
    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn active(&self) -> ScreenKind {
        self.active
    }

    /// Take one poll's raw readings
    ///
    /// Every `log_every` polls the smoothed readings are appended to the
    /// sample store.
    pub fn record(&mut self, raw: Readings) {
        #[cfg(feature = "defmt")]
        if raw.co2_ppm.is_none() || raw.temperature_x10.is_none() {
            defmt::warn!("sensor reading missing: {}", raw);
        }

        self.readings = self.filters.apply(raw);
        self.readings_dirty = true;

        self.polls += 1;
        if self.polls >= self.config.log_every {
            self.polls = 0;
            self.log_sample();
        }
    }

    fn log_sample(&mut self) {
        let r = &self.readings;
        self.store.add_value(
            Channel::Co2.encode(r.co2_ppm.map(i32::from)),
            Channel::Temperature.encode(r.temperature_c().map(i32::from)),
            Channel::Humidity.encode(r.humidity_pct().map(i32::from)),
        );
        self.log_dirty = true;
    }

    /// Route an input event to the active screen, or advance the screen
    pub fn handle_input(&mut self, event: InputEvent) {
        match event.code() {
            Some(code) => self.screens[self.active.index()].input(code),
            None => {
                self.active = self.active.next();
                self.switch_pending = true;
                #[cfg(feature = "defmt")]
                defmt::debug!("switching to {}", self.active);
            }
        }
    }

    /// Clear the panel and draw the active screen in full
    pub fn start<T: PageTransport + ?Sized>(&mut self, transport: &mut T) -> Result<(), DisplayError> {
        transport.clear_all()?;
        self.draw_active(transport, true)
    }

    /// Redraw the active screen if anything it shows may have changed
    ///
    /// Returns whether anything was drawn.
    pub fn render<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<bool, DisplayError> {
        if self.switch_pending {
            self.switch_pending = false;
            self.start(transport)?;
            return Ok(true);
        }

        let pending = self.screens[self.active.index()].need_redraw();
        let stale = match self.active {
            ScreenKind::Main => self.readings_dirty,
            ScreenKind::Chart => self.log_dirty,
        };
        if !(pending || stale) {
            return Ok(false);
        }

        self.draw_active(transport, false)?;
        Ok(true)
    }

    fn draw_active<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        force: bool,
    ) -> Result<(), DisplayError> {
        let view = View {
            readings: &self.readings,
            store: &self.store,
        };
        self.screens[self.active.index()].draw(transport, view, force)?;
        self.readings_dirty = false;
        self.log_dirty = false;
        Ok(())
    }
}
