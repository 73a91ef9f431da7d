//! Display transport trait
//!
//! The rendering pipeline never talks to the display controller directly.
//! Everything it draws goes through a [`PageTransport`], which writes runs
//! of column bytes into one page of the panel. Implementations handle the
//! controller's addressing commands and the bus.

use crate::layout::{DISPLAY_COLUMNS, DISPLAY_PAGES, PAGE_HEIGHT};
use crate::raster::{column_span, row_mask};

/// Display transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the display controller
    Communication,
    /// Page or column outside the panel
    InvalidCoordinates,
}

/// Page-addressed display transport
///
/// Calls are not reentrant: one page write completes before the next begins.
pub trait PageTransport {
    /// Write `bytes` to consecutive columns of `page`, starting at `column`
    fn draw_page(&mut self, page: u8, column: u8, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Zero `len` columns of `page`, starting at `column`
    fn clear_page(&mut self, page: u8, column: u8, len: u8) -> Result<(), DisplayError>;

    /// Zero the whole panel
    fn clear_all(&mut self) -> Result<(), DisplayError> {
        for page in 0..DISPLAY_PAGES {
            self.clear_page(page, 0, DISPLAY_COLUMNS)?;
        }
        Ok(())
    }

    /// Light a single pixel
    ///
    /// The transport cannot read back, so the other seven pixels sharing the
    /// page byte are cleared.
    fn draw_pixel(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
        self.draw_page(y / PAGE_HEIGHT, x, &[row_mask(y)])
    }

    /// Draw row `y` across columns `[x, x + len)`
    fn draw_line_h(&mut self, x: u8, y: u8, len: u8) -> Result<(), DisplayError> {
        const CHUNK: usize = 16;
        let run = [row_mask(y); CHUNK];
        let mut col = x as u16;
        let end = (x as u16 + len as u16).min(DISPLAY_COLUMNS as u16);
        while col < end {
            let n = (end - col).min(CHUNK as u16) as usize;
            self.draw_page(y / PAGE_HEIGHT, col as u8, &run[..n])?;
            col += n as u16;
        }
        Ok(())
    }

    /// Draw `len` rows of column `x`, starting at row `y`
    fn draw_line_v(&mut self, x: u8, y: u8, len: u8) -> Result<(), DisplayError> {
        for (page, mask) in column_span(y, len) {
            if page >= DISPLAY_PAGES {
                break;
            }
            self.draw_page(page, x, &[mask])?;
        }
        Ok(())
    }
}

impl<T: PageTransport + ?Sized> PageTransport for &mut T {
    fn draw_page(&mut self, page: u8, column: u8, bytes: &[u8]) -> Result<(), DisplayError> {
        (**self).draw_page(page, column, bytes)
    }

    fn clear_page(&mut self, page: u8, column: u8, len: u8) -> Result<(), DisplayError> {
        (**self).clear_page(page, column, len)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shadow-frame transport for rendering tests

    use super::*;

    const COLS: usize = DISPLAY_COLUMNS as usize;
    const PAGES: usize = DISPLAY_PAGES as usize;

    /// Records every write into an in-memory copy of the panel
    pub struct RecordingTransport {
        pub frame: [[u8; COLS]; PAGES],
        /// Number of `draw_page` calls
        pub draws: usize,
        /// Number of `clear_page` calls
        pub clears: usize,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self {
                frame: [[0; COLS]; PAGES],
                draws: 0,
                clears: 0,
            }
        }

        /// Total transport operations
        pub fn ops(&self) -> usize {
            self.draws + self.clears
        }

        pub fn reset_counts(&mut self) {
            self.draws = 0;
            self.clears = 0;
        }

        pub fn pixel(&self, x: u8, y: u8) -> bool {
            self.frame[(y / PAGE_HEIGHT) as usize][x as usize] & row_mask(y) != 0
        }

        /// Column bytes of `x` over pages `[first, first + count)`
        pub fn column(&self, x: u8, first: u8, count: u8) -> heapless::Vec<u8, PAGES> {
            (first..first + count)
                .map(|page| self.frame[page as usize][x as usize])
                .collect()
        }

        /// Whether any pixel in columns `[x, x + width)` of the given pages is set
        pub fn any_set(&self, x: u8, width: u8, first_page: u8, pages: u8) -> bool {
            (first_page..first_page + pages).any(|page| {
                self.frame[page as usize][x as usize..x as usize + width as usize]
                    .iter()
                    .any(|&b| b != 0)
            })
        }

        fn check(page: u8, column: u8, len: usize) -> Result<(), DisplayError> {
            if page >= DISPLAY_PAGES || column as usize + len > COLS {
                return Err(DisplayError::InvalidCoordinates);
            }
            Ok(())
        }
    }

    impl PageTransport for RecordingTransport {
        fn draw_page(&mut self, page: u8, column: u8, bytes: &[u8]) -> Result<(), DisplayError> {
            Self::check(page, column, bytes.len())?;
            let start = column as usize;
            self.frame[page as usize][start..start + bytes.len()].copy_from_slice(bytes);
            self.draws += 1;
            Ok(())
        }

        fn clear_page(&mut self, page: u8, column: u8, len: u8) -> Result<(), DisplayError> {
            Self::check(page, column, len as usize)?;
            let start = column as usize;
            self.frame[page as usize][start..start + len as usize].fill(0);
            self.clears += 1;
            Ok(())
        }
    }
}
