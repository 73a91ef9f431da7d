//! Number field compositor
//!
//! Lays out a signed integer as a run of digit glyphs followed by a unit
//! label, e.g. `-12C` or `740P`.

use heapless::Vec;

use crate::glyph::Symbol;
use crate::layout::FieldRect;
use crate::printer::GlyphPrinter;
use crate::transport::{DisplayError, PageTransport};

/// Longest rendering of an `i16`: sign plus five digits
pub const MAX_SYMBOLS: usize = 6;

/// Minimum gap between digits, in columns
const MIN_DIGIT_GAP: u8 = 2;

/// Symbols for `value`, most significant first
///
/// Zero yields a single `0`; negative values start with a minus sign.
pub fn number_symbols(value: i16) -> Vec<Symbol, MAX_SYMBOLS> {
    let mut symbols: Vec<Symbol, MAX_SYMBOLS> = Vec::new();
    let mut magnitude = value.unsigned_abs();

    // At most five digits and a sign, so no push can overflow MAX_SYMBOLS
    loop {
        if let Some(digit) = Symbol::digit((magnitude % 10) as u8) {
            symbols.push(digit).ok();
        }
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }
    if value < 0 {
        symbols.push(Symbol::MINUS).ok();
    }

    symbols.reverse();
    symbols
}

/// A number with a trailing unit label at a fixed screen position
///
/// The field is bound to its geometry at start-up. Printers are lent per
/// call so that several fields can share one glyph cell buffer.
#[derive(Debug, Clone, Copy)]
pub struct NumberField {
    rect: FieldRect,
}

impl NumberField {
    pub const fn new(rect: FieldRect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> FieldRect {
        self.rect
    }

    /// Clear the field and render `value` followed by `label`
    ///
    /// `digits` draws the number. `label` draws the unit; pass `None` to draw
    /// the unit with the digit printer. The label's bottom page is aligned
    /// with the digits' bottom page.
    pub fn set_number<T: PageTransport + ?Sized>(
        &self,
        transport: &mut T,
        digits: &mut GlyphPrinter,
        label: Option<&mut GlyphPrinter>,
        value: i16,
        label_symbol: Symbol,
    ) -> Result<(), DisplayError> {
        let FieldRect { x, page, width } = self.rect;
        digits.clear(transport, x, page, width)?;

        let gap = (digits.width() / 3).max(MIN_DIGIT_GAP) as u16;
        let mut x_offset: u16 = 0;
        for symbol in number_symbols(value) {
            let drawn = digits.print(transport, symbol, column_at(x, x_offset), page)?;
            x_offset += drawn as u16 + gap;
        }

        let label_x = column_at(x, x_offset + (digits.width() / 4) as u16);
        let digit_pages = digits.pages();
        let label = match label {
            Some(printer) => printer,
            None => digits,
        };
        let label_page = page + digit_pages - label.pages();
        label.print(transport, label_symbol, label_x, label_page)?;

        Ok(())
    }
}

/// Absolute column for an offset from `x`, saturating past the panel
fn column_at(x: u8, offset: u16) -> u8 {
    (x as u16 + offset).min(u8::MAX as u16) as u8
}
