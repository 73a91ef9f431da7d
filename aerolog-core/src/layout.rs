//! Display geometry and screen layout constants
//!
//! The panel is a 128x64 monochrome OLED addressed in pages: each page is a
//! horizontal strip of 8 pixel rows stored as one byte per column.

use crate::store::STORE_CAPACITY;

/// Pixel rows per display page
pub const PAGE_HEIGHT: u8 = 8;

/// Display width in columns
pub const DISPLAY_COLUMNS: u8 = 128;

/// Display height in pages
pub const DISPLAY_PAGES: u8 = 8;

/// Number of chart columns.
///
/// The chart reads column `i` as ring offset `i` into the sample store, which
/// only walks the samples oldest-to-newest because the store holds exactly one
/// sample per chart column. Changing either constant alone breaks the chart
/// ordering, so the pairing is checked at compile time below.
pub const CHART_COLUMNS: usize = DISPLAY_COLUMNS as usize;

const _: () = assert!(
    CHART_COLUMNS == STORE_CAPACITY,
    "chart columns must equal sample store capacity"
);

/// First page of the trend chart (page 0 holds the summary fields)
pub const CHART_TOP_PAGE: u8 = 1;

/// Height of the trend chart in pages
pub const CHART_PAGES: u8 = DISPLAY_PAGES - CHART_TOP_PAGE;

/// Large digit glyph (main screen values)
pub const LARGE_GLYPH: GlyphSize = GlyphSize::new(12, 4);

/// Unit label glyph, also used for the calibration marker digits
pub const LABEL_GLYPH: GlyphSize = GlyphSize::new(7, 2);

/// Single-page glyph used on the chart summary row
pub const TINY_GLYPH: GlyphSize = GlyphSize::new(4, 1);

/// Glyph cell dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphSize {
    /// Width in columns
    pub width: u8,
    /// Height in pages
    pub pages: u8,
}

impl GlyphSize {
    pub const fn new(width: u8, pages: u8) -> Self {
        Self { width, pages }
    }
}

/// Placement of a number field on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldRect {
    /// Left column
    pub x: u8,
    /// Top page
    pub page: u8,
    /// Reserved width in columns (cleared before each render)
    pub width: u8,
}

impl FieldRect {
    pub const fn new(x: u8, page: u8, width: u8) -> Self {
        Self { x, page, width }
    }
}

/// Main screen: CO2 reading, top left, up to the marker field
pub const MAIN_CO2: FieldRect = FieldRect::new(0, 0, 90);
/// Main screen: supply voltage / calibration marker, top right
pub const MAIN_MARKER: FieldRect = FieldRect::new(90, 0, 32);
/// Main screen: temperature, bottom left
pub const MAIN_TEMPERATURE: FieldRect = FieldRect::new(0, 4, 64);
/// Main screen: humidity, bottom right
pub const MAIN_HUMIDITY: FieldRect = FieldRect::new(64, 4, 64);

/// Chart screen summary row, left to right:
/// temperature, humidity, CO2, supply voltage
pub const CHART_SUMMARY: [FieldRect; 4] = [
    FieldRect::new(0, 0, 32),
    FieldRect::new(32, 0, 32),
    FieldRect::new(64, 0, 32),
    FieldRect::new(96, 0, 32),
];
