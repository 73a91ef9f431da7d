//! Seven-segment glyph renderer
//!
//! Symbols are drawn from straight strokes on a fixed seven-segment
//! topology, so any glyph size can be produced from the same stroke table:
//!
//! ```text
//!   ─0─        0 top bar
//!  5   1       1 upper right    2 lower right
//!   ─6─        3 bottom bar
//!  4   2       4 lower left     5 upper left
//!   ─3─        6 middle bar
//! ```
//!
//! Bit 7 of a stroke code marks a half-width glyph ("1" and the minus sign),
//! which keeps narrow symbols from consuming a full cell when composed into a
//! number.

use crate::raster::PageCanvas;

/// Stroke set of one glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Strokes(u8);

impl Strokes {
    pub const TOP: u8 = 1 << 0;
    pub const UPPER_RIGHT: u8 = 1 << 1;
    pub const LOWER_RIGHT: u8 = 1 << 2;
    pub const BOTTOM: u8 = 1 << 3;
    pub const LOWER_LEFT: u8 = 1 << 4;
    pub const UPPER_LEFT: u8 = 1 << 5;
    pub const MIDDLE: u8 = 1 << 6;
    pub const HALF_WIDTH: u8 = 1 << 7;

    /// Raw stroke code, including the half-width flag
    pub const fn code(self) -> u8 {
        self.0
    }

    /// The seven segment bits without the half-width flag
    pub const fn segments(self) -> u8 {
        self.0 & !Self::HALF_WIDTH
    }

    pub const fn has(self, stroke: u8) -> bool {
        self.0 & stroke != 0
    }

    pub const fn is_half_width(self) -> bool {
        self.has(Self::HALF_WIDTH)
    }
}

/// Stroke codes indexed by symbol
const STROKE_TABLE: [u8; Symbol::COUNT] = [
    0b0011_1111, // 0
    0b1000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
    0b1100_0000, // -
    0b0111_0110, // H
    0b0011_1001, // C
    0b0011_1110, // U
    0b0111_0011, // P
];

/// A drawable symbol
///
/// Only indices covered by the stroke table can be constructed, so every
/// `Symbol` is safe to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbol(u8);

impl Symbol {
    /// Number of symbols in the stroke table
    pub const COUNT: usize = 15;

    pub const MINUS: Symbol = Symbol(10);
    /// Humidity unit
    pub const H: Symbol = Symbol(11);
    /// Temperature unit
    pub const C: Symbol = Symbol(12);
    /// Voltage unit
    pub const U: Symbol = Symbol(13);
    /// CO2 unit (ppm)
    pub const P: Symbol = Symbol(14);

    /// Symbol at a stroke table index
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Symbol(index))
        } else {
            None
        }
    }

    /// Decimal digit symbol
    pub const fn digit(d: u8) -> Option<Self> {
        if d < 10 {
            Some(Symbol(d))
        } else {
            None
        }
    }

    /// Symbol for an ASCII character; anything but a digit renders as minus
    pub const fn from_ascii(c: u8) -> Self {
        if c.is_ascii_digit() {
            Symbol(c - b'0')
        } else {
            Self::MINUS
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn strokes(self) -> Strokes {
        Strokes(STROKE_TABLE[self.0 as usize])
    }
}

/// Render `symbol` into `buf`, a `width * pages` page-organized bitmap
///
/// The buffer is zeroed first. Returns the drawn width, which is `width / 2`
/// for half-width symbols. The glyph uses `pages * 6` rows, leaving the
/// bottom rows of the cell as spacing.
pub fn draw_glyph(symbol: Symbol, width: u8, pages: u8, buf: &mut [u8]) -> u8 {
    let mut canvas = PageCanvas::new(buf, width);
    canvas.clear();

    let strokes = symbol.strokes();
    let h = pages * 8 - pages * 2;
    let half = h / 2;
    let w = if strokes.is_half_width() {
        width / 2
    } else {
        width
    };
    let right = w.saturating_sub(1);

    if strokes.has(Strokes::TOP) {
        canvas.line_h(0, 0, w);
    }
    if strokes.has(Strokes::UPPER_RIGHT) {
        canvas.line_v(right, 0, half);
    }
    if strokes.has(Strokes::LOWER_RIGHT) {
        canvas.line_v(right, half, half);
    }
    if strokes.has(Strokes::BOTTOM) {
        canvas.line_h(0, h - 1, w);
    }
    if strokes.has(Strokes::LOWER_LEFT) {
        canvas.line_v(0, h / 2, h / 2);
    }
    if strokes.has(Strokes::UPPER_LEFT) {
        canvas.line_v(0, 0, h / 2);
    }
    if strokes.has(Strokes::MIDDLE) {
        canvas.line_h(0, h / 2, w);
    }

    w
}
