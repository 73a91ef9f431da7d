//! Page-buffer line rasterizer
//!
//! Bitmaps are stored page-major: the byte at `(page, x)` holds the 8 pixel
//! rows `[8 * page, 8 * page + 8)` of column `x`, with bit 0 the topmost row.
//! All drawing is additive (bits are only ever set); a fresh drawing starts
//! from a cleared buffer.

use crate::layout::PAGE_HEIGHT;

/// A run of set bits in one column, split into per-page byte masks
///
/// Yields `(page, mask)` pairs: a partial head byte shifted by `y % 8`, zero
/// or more full `0xFF` bytes, then a partial tail holding only low-order
/// bits. A run that fits in the head yields a single item and an empty tail
/// yields nothing.
#[derive(Debug, Clone)]
pub struct ColumnSpan {
    page: u8,
    offset: u8,
    remaining: u16,
}

/// Split the vertical run `[y, y + len)` into page masks
pub fn column_span(y: u8, len: u8) -> ColumnSpan {
    ColumnSpan {
        page: y / PAGE_HEIGHT,
        offset: y % PAGE_HEIGHT,
        remaining: len as u16,
    }
}

impl Iterator for ColumnSpan {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let room = (PAGE_HEIGHT - self.offset) as u16;
        let bits = self.remaining.min(room);
        let mask = (((1u16 << bits) - 1) << self.offset) as u8;
        let page = self.page;

        self.remaining -= bits;
        self.offset = 0;
        self.page = self.page.saturating_add(1);

        Some((page, mask))
    }
}

/// Bit mask selecting row `y` within its page
pub const fn row_mask(y: u8) -> u8 {
    1 << (y % PAGE_HEIGHT)
}

/// A page-organized 1-bit canvas over a borrowed byte buffer
///
/// The buffer holds `pages` rows of `width` bytes. Writes outside the canvas
/// are clipped.
pub struct PageCanvas<'a> {
    bytes: &'a mut [u8],
    width: usize,
}

impl<'a> PageCanvas<'a> {
    /// Wrap a buffer of `width * pages` bytes
    pub fn new(bytes: &'a mut [u8], width: u8) -> Self {
        Self {
            bytes,
            width: width as usize,
        }
    }

    /// Canvas width in columns
    pub fn width(&self) -> u8 {
        self.width as u8
    }

    /// Canvas height in pages
    pub fn pages(&self) -> usize {
        self.bytes.len().checked_div(self.width).unwrap_or(0)
    }

    /// Zero every byte
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set one bit per column in row `y`, columns `[x, x + len)`
    pub fn line_h(&mut self, x: u8, y: u8, len: u8) {
        let page = y / PAGE_HEIGHT;
        let mask = row_mask(y);
        for col in x as usize..(x as usize + len as usize) {
            if let Some(byte) = self.byte_mut(page, col) {
                *byte |= mask;
            }
        }
    }

    /// Set `len` consecutive bits in column `x`, starting at row `y`
    pub fn line_v(&mut self, x: u8, y: u8, len: u8) {
        for (page, mask) in column_span(y, len) {
            if let Some(byte) = self.byte_mut(page, x as usize) {
                *byte |= mask;
            }
        }
    }

    /// Whether the pixel at `(x, y)` is set
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        let index = (y / PAGE_HEIGHT) as usize * self.width + x as usize;
        (x as usize) < self.width
            && self
                .bytes
                .get(index)
                .is_some_and(|byte| byte & row_mask(y) != 0)
    }

    /// Bytes of one page row
    pub fn page(&self, page: usize) -> &[u8] {
        let start = page * self.width;
        &self.bytes[start..start + self.width]
    }

    fn byte_mut(&mut self, page: u8, col: usize) -> Option<&mut u8> {
        if col >= self.width {
            return None;
        }
        self.bytes.get_mut(page as usize * self.width + col)
    }
}
