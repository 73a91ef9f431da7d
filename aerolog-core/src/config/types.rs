//! Configuration type definitions

use crate::screen::ScreenKind;

/// Shortest allowed sensor poll interval (DHT22 minimum sampling period)
pub const MIN_POLL_INTERVAL_MS: u32 = 2_000;

/// Longest allowed sensor poll interval
pub const MAX_POLL_INTERVAL_MS: u32 = 600_000;

/// Allowed debounce period range
pub const DEBOUNCE_RANGE_MS: core::ops::RangeInclusive<u32> = 1..=500;

/// Monitor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Time between sensor polls
    pub poll_interval_ms: u32,
    /// Polls per logged sample
    pub log_every: u16,
    /// MH-Z19 automatic baseline correction, applied at boot
    pub co2_auto_calibration: bool,
    /// Input debounce period
    pub debounce_ms: u32,
    /// Display contrast
    pub contrast: u8,
    /// Screen shown after boot
    pub start_screen: ScreenKind,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            log_every: 30,
            co2_auto_calibration: true,
            debounce_ms: 20,
            contrast: 0xCF,
            start_screen: ScreenKind::Chart,
        }
    }
}

impl MonitorConfig {
    /// Time covered by the full sample store, in seconds
    pub fn history_span_s(&self) -> u32 {
        let per_sample_ms = self.poll_interval_ms as u64 * self.log_every as u64;
        let span = per_sample_ms / 1000 * crate::store::STORE_CAPACITY as u64;
        span.min(u32::MAX as u64) as u32
    }
}
