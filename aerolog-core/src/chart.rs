//! Trend chart widget
//!
//! Draws the whole sample store as three sparkline traces below the summary
//! row. Column `i` shows ring offset `i`, so the oldest sample is on the left
//! and the newest on the right. Each channel is scaled to its own range.

use crate::layout::{CHART_COLUMNS, CHART_PAGES, CHART_TOP_PAGE, PAGE_HEIGHT};
use crate::store::{Channel, SampleStore, NO_DATA};
use crate::transport::{DisplayError, PageTransport};

/// Pixel rows available to the traces
const CHART_ROWS: u16 = CHART_PAGES as u16 * PAGE_HEIGHT as u16;

/// Channel drawn on even columns only, to tell it apart from the others
const DOTTED: Channel = Channel::Temperature;

/// Value range of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    min: u16,
    max: u16,
}

impl Range {
    /// Range of `channel` over the whole store, widened when degenerate
    fn of(store: &SampleStore, channel: Channel) -> Self {
        let min = store.min(channel) as u16;
        let max = store.max(channel) as u16;
        if min == max {
            Self {
                min: min.saturating_sub(1),
                max: max + 1,
            }
        } else {
            Self { min, max }
        }
    }

    /// Trace height of `value`, 0 at the bottom row
    fn scale(self, value: u8) -> u16 {
        let v = (value as u16).saturating_sub(self.min);
        (v * (CHART_ROWS - 1) / (self.max - self.min)).min(CHART_ROWS - 1)
    }
}

/// Sparkline chart over [`CHART_PAGES`] pages starting at [`CHART_TOP_PAGE`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendChart;

impl TrendChart {
    pub const fn new() -> Self {
        Self
    }

    /// Render every column; the `cursor` column, if any, is inverted
    pub fn draw<T: PageTransport + ?Sized>(
        &self,
        transport: &mut T,
        store: &SampleStore,
        cursor: Option<u8>,
    ) -> Result<(), DisplayError> {
        let ranges = Channel::ALL.map(|channel| Range::of(store, channel));
        for index in 0..CHART_COLUMNS as u8 {
            let bytes = Self::column_bytes(store, &ranges, index, cursor == Some(index));
            Self::send_column(transport, index, &bytes)?;
        }
        Ok(())
    }

    /// Render a single column
    pub fn draw_column<T: PageTransport + ?Sized>(
        &self,
        transport: &mut T,
        store: &SampleStore,
        index: u8,
        is_cursor: bool,
    ) -> Result<(), DisplayError> {
        let ranges = Channel::ALL.map(|channel| Range::of(store, channel));
        let bytes = Self::column_bytes(store, &ranges, index, is_cursor);
        Self::send_column(transport, index, &bytes)
    }

    fn column_bytes(
        store: &SampleStore,
        ranges: &[Range; 3],
        index: u8,
        is_cursor: bool,
    ) -> [u8; CHART_PAGES as usize] {
        let mut bytes = [0u8; CHART_PAGES as usize];

        for (channel, range) in Channel::ALL.iter().zip(ranges) {
            if *channel == DOTTED && index & 1 == 1 {
                continue;
            }
            let value = store.last(*channel, index as i16);
            if value == NO_DATA {
                continue;
            }

            // Larger values are drawn higher up
            let row = CHART_ROWS - 1 - range.scale(value);
            bytes[(row / PAGE_HEIGHT as u16) as usize] |= 1 << (row % PAGE_HEIGHT as u16);
        }

        if is_cursor {
            for byte in bytes.iter_mut() {
                *byte = !*byte;
            }
        }
        bytes
    }

    fn send_column<T: PageTransport + ?Sized>(
        transport: &mut T,
        index: u8,
        bytes: &[u8; CHART_PAGES as usize],
    ) -> Result<(), DisplayError> {
        for (i, byte) in bytes.iter().enumerate() {
            transport.draw_page(CHART_TOP_PAGE + i as u8, index, core::slice::from_ref(byte))?;
        }
        Ok(())
    }
}
