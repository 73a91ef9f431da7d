//! Glyph printer
//!
//! Renders one symbol at a time into a private scratch bitmap and pushes it
//! to the display page by page. Only one glyph cell is ever held in memory.

use alloc::boxed::Box;
use alloc::vec;

use crate::glyph::{draw_glyph, Symbol};
use crate::layout::{GlyphSize, DISPLAY_COLUMNS};
use crate::transport::{DisplayError, PageTransport};

/// Renders symbols of one fixed cell size
pub struct GlyphPrinter {
    width: u8,
    pages: u8,
    /// `width * pages` bytes, allocated once
    scratch: Box<[u8]>,
}

impl GlyphPrinter {
    /// Create a printer for `size` cells
    ///
    /// Allocates the scratch buffer. Call during start-up only: an allocation
    /// failure aborts.
    pub fn new(size: GlyphSize) -> Self {
        Self {
            width: size.width,
            pages: size.pages,
            scratch: vec![0; size.width as usize * size.pages as usize].into_boxed_slice(),
        }
    }

    /// Full cell width in columns
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Cell height in pages
    pub fn pages(&self) -> u8 {
        self.pages
    }

    /// Print `symbol` with its top-left corner at `(column, start_page)`
    ///
    /// Returns the drawn width. Columns beyond the right edge of the panel
    /// are dropped.
    pub fn print<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        symbol: Symbol,
        column: u8,
        start_page: u8,
    ) -> Result<u8, DisplayError> {
        let drawn = draw_glyph(symbol, self.width, self.pages, &mut self.scratch);
        if column >= DISPLAY_COLUMNS {
            return Ok(drawn);
        }

        let visible = drawn.min(DISPLAY_COLUMNS - column) as usize;
        for (i, row) in self.scratch.chunks_exact(self.width as usize).enumerate() {
            transport.draw_page(start_page + i as u8, column, &row[..visible])?;
        }

        Ok(drawn)
    }

    /// Blank `width` columns over this printer's page span
    pub fn clear<T: PageTransport + ?Sized>(
        &self,
        transport: &mut T,
        x: u8,
        start_page: u8,
        width: u8,
    ) -> Result<(), DisplayError> {
        if x >= DISPLAY_COLUMNS {
            return Ok(());
        }
        let width = width.min(DISPLAY_COLUMNS - x);
        for page in start_page..start_page + self.pages {
            transport.clear_page(page, x, width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::RecordingTransport;

    #[test]
    fn test_print_pushes_each_page() {
        let mut t = RecordingTransport::new();
        let mut printer = GlyphPrinter::new(GlyphSize::new(12, 4));

        let drawn = printer
            .print(&mut t, Symbol::digit(8).unwrap(), 20, 2)
            .unwrap();

        assert_eq!(drawn, 12);
        assert_eq!(t.draws, 4);
        // Top bar on row 16 (page 2, bit 0), bottom bar on row 16 + 23
        assert!(t.pixel(26, 16));
        assert!(t.pixel(26, 39));
        assert!(!t.pixel(26, 40));
        assert!(!t.any_set(0, 20, 0, 8));
        assert!(!t.any_set(32, 96, 0, 8));
    }

    #[test]
    fn test_print_half_width_sends_narrow_rows() {
        let mut t = RecordingTransport::new();
        let mut printer = GlyphPrinter::new(GlyphSize::new(12, 4));

        let drawn = printer
            .print(&mut t, Symbol::digit(1).unwrap(), 0, 0)
            .unwrap();

        assert_eq!(drawn, 6);
        assert!(t.pixel(5, 3));
        assert!(!t.any_set(6, 6, 0, 4));
    }

    #[test]
    fn test_print_clips_at_right_edge() {
        let mut t = RecordingTransport::new();
        let mut printer = GlyphPrinter::new(GlyphSize::new(12, 4));

        let drawn = printer
            .print(&mut t, Symbol::digit(0).unwrap(), 120, 0)
            .unwrap();
        assert_eq!(drawn, 12);
        assert!(t.pixel(120, 5));

        t.reset_counts();
        printer
            .print(&mut t, Symbol::digit(0).unwrap(), 200, 0)
            .unwrap();
        assert_eq!(t.ops(), 0);
    }

    #[test]
    fn test_clear_blanks_region() {
        let mut t = RecordingTransport::new();
        let mut printer = GlyphPrinter::new(GlyphSize::new(7, 2));
        printer.print(&mut t, Symbol::H, 10, 6).unwrap();
        assert!(t.any_set(10, 7, 6, 2));

        printer.clear(&mut t, 10, 6, 7).unwrap();
        assert!(!t.any_set(0, 128, 0, 8));
        assert_eq!(t.clears, 2);
    }
}
