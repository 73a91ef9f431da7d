//! SSD1306 OLED display driver
//!
//! Driver for 128x64 SSD1306 panels over I2C. The driver keeps no frame
//! buffer: every page write sets the controller's address window and streams
//! the bytes straight to display RAM.

use aerolog_core::layout::{DISPLAY_COLUMNS, DISPLAY_PAGES};
use aerolog_core::{DisplayError, PageTransport};
use embedded_hal::i2c::I2c;

/// Default SSD1306 I2C address
pub const SSD1306_ADDR: u8 = 0x3C;

/// Data bytes per I2C write
const PACKET: usize = 16;

/// Control byte: command stream follows
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte: display RAM data follows
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const SET_SEG_REMAP: u8 = 0xA0;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// SSD1306 driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ssd1306<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SSD1306_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Initialize the controller and switch the panel on
    pub fn init(&mut self, contrast: u8) -> Result<(), DisplayError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MULTIPLEX,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE | 0x00,
            cmd::SET_CHARGE_PUMP,
            0x14, // Internal charge pump
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP | 0x01,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            contrast,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(cmd::SET_CONTRAST)?;
        self.command(contrast)
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.command(if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        })
    }

    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF })
    }

    fn command(&mut self, c: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, c])
            .map_err(|_| DisplayError::Communication)
    }

    /// Point the RAM write pointer at `(page, column)`
    ///
    /// The window extends to the bottom-right corner so a write that runs
    /// past the last column continues on the next page.
    fn set_window(&mut self, page: u8, column: u8) -> Result<(), DisplayError> {
        self.command(cmd::COLUMN_ADDR)?;
        self.command(column)?;
        self.command(DISPLAY_COLUMNS - 1)?;
        self.command(cmd::PAGE_ADDR)?;
        self.command(page)?;
        self.command(DISPLAY_PAGES - 1)
    }

    /// Stream `len` bytes produced by `byte` to display RAM
    fn data(&mut self, len: usize, byte: impl Fn(usize) -> u8) -> Result<(), DisplayError> {
        let mut packet = [0u8; PACKET + 1];
        packet[0] = CONTROL_DATA;

        let mut sent = 0;
        while sent < len {
            let n = (len - sent).min(PACKET);
            for (i, slot) in packet[1..=n].iter_mut().enumerate() {
                *slot = byte(sent + i);
            }
            self.i2c
                .write(self.address, &packet[..=n])
                .map_err(|_| DisplayError::Communication)?;
            sent += n;
        }
        Ok(())
    }

    /// Columns of a run starting at `column` that land on the panel
    fn visible(page: u8, column: u8, len: usize) -> Result<usize, DisplayError> {
        if page >= DISPLAY_PAGES {
            return Err(DisplayError::InvalidCoordinates);
        }
        Ok(len.min(DISPLAY_COLUMNS.saturating_sub(column) as usize))
    }
}

impl<I2C: I2c> PageTransport for Ssd1306<I2C> {
    fn draw_page(&mut self, page: u8, column: u8, bytes: &[u8]) -> Result<(), DisplayError> {
        let len = Self::visible(page, column, bytes.len())?;
        if len == 0 {
            return Ok(());
        }
        self.set_window(page, column)?;
        self.data(len, |i| bytes[i])
    }

    fn clear_page(&mut self, page: u8, column: u8, len: u8) -> Result<(), DisplayError> {
        let len = Self::visible(page, column, len as usize)?;
        if len == 0 {
            return Ok(());
        }
        self.set_window(page, column)?;
        self.data(len, |_| 0)
    }

    /// One window covering the panel, then 1024 zero bytes
    fn clear_all(&mut self) -> Result<(), DisplayError> {
        self.set_window(0, 0)?;
        self.data(DISPLAY_COLUMNS as usize * DISPLAY_PAGES as usize, |_| 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    const COLS: usize = DISPLAY_COLUMNS as usize;
    const PAGES: usize = DISPLAY_PAGES as usize;

    /// Emulates the controller's command parser and horizontal-mode RAM
    struct MockPanel {
        ram: [[u8; COLS]; PAGES],
        commands: Vec<u8>,
        writes: usize,
        pending: Vec<u8>,
        column: (usize, usize),
        page: (usize, usize),
        pointer: (usize, usize),
        fail: bool,
    }

    impl MockPanel {
        fn new() -> Self {
            Self {
                ram: [[0; COLS]; PAGES],
                commands: Vec::new(),
                writes: 0,
                pending: Vec::new(),
                column: (0, COLS - 1),
                page: (0, PAGES - 1),
                pointer: (0, 0),
                fail: false,
            }
        }

        fn command(&mut self, c: u8) {
            self.commands.push(c);
            self.pending.push(c);
            match self.pending.as_slice() {
                [cmd::COLUMN_ADDR, start, end] => {
                    self.column = (*start as usize, *end as usize);
                    self.pointer.1 = *start as usize;
                    self.pending.clear();
                }
                [cmd::PAGE_ADDR, start, end] => {
                    self.page = (*start as usize, *end as usize);
                    self.pointer.0 = *start as usize;
                    self.pending.clear();
                }
                [cmd::COLUMN_ADDR] | [cmd::COLUMN_ADDR, _] => {}
                [cmd::PAGE_ADDR] | [cmd::PAGE_ADDR, _] => {}
                _ => self.pending.clear(),
            }
        }

        fn data(&mut self, byte: u8) {
            let (page, col) = self.pointer;
            self.ram[page][col] = byte;
            if col == self.column.1 {
                self.pointer.1 = self.column.0;
                self.pointer.0 = if page == self.page.1 { self.page.0 } else { page + 1 };
            } else {
                self.pointer.1 = col + 1;
            }
        }
    }

    impl ErrorType for MockPanel {
        type Error = ErrorKind;
    }

    impl I2c for MockPanel {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            assert_eq!(address, SSD1306_ADDR);
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes += 1;
                    match bytes.split_first() {
                        Some((&CONTROL_COMMAND, rest)) => {
                            rest.iter().for_each(|&c| self.command(c))
                        }
                        Some((&CONTROL_DATA, rest)) => rest.iter().for_each(|&b| self.data(b)),
                        _ => panic!("unexpected control byte"),
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut display = Ssd1306::new(MockPanel::new());
        display.init(0x7F).unwrap();

        let panel = display.release();
        assert_eq!(panel.commands.first(), Some(&cmd::DISPLAY_OFF));
        assert_eq!(panel.commands.last(), Some(&cmd::DISPLAY_ON));
        assert_eq!(panel.commands.len(), 25);
        let contrast = panel
            .commands
            .windows(2)
            .find(|w| w[0] == cmd::SET_CONTRAST)
            .map(|w| w[1]);
        assert_eq!(contrast, Some(0x7F));
    }

    #[test]
    fn test_draw_page_lands_at_window() {
        let mut display = Ssd1306::new(MockPanel::new());
        display.draw_page(3, 10, &[0xAA, 0x55, 0x0F]).unwrap();

        let panel = display.release();
        assert_eq!(&panel.ram[3][10..13], &[0xAA, 0x55, 0x0F]);
        assert_eq!(panel.ram[3][13], 0);
        assert_eq!(panel.ram[4][0], 0);
    }

    #[test]
    fn test_long_runs_are_packetized() {
        let mut display = Ssd1306::new(MockPanel::new());
        let bytes = [0xFFu8; 40];
        display.draw_page(0, 0, &bytes).unwrap();

        let panel = display.release();
        // 6 window commands + 3 data packets (16 + 16 + 8)
        assert_eq!(panel.writes, 6 + 3);
        assert!(panel.ram[0][..40].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_draw_page_clips_at_last_column() {
        let mut display = Ssd1306::new(MockPanel::new());
        display.draw_page(2, 124, &[1, 2, 3, 4, 5, 6]).unwrap();

        let panel = display.release();
        assert_eq!(&panel.ram[2][124..], &[1, 2, 3, 4]);
        // Nothing wrapped onto the next page
        assert_eq!(panel.ram[3][0], 0);
    }

    #[test]
    fn test_draw_page_rejects_bad_page() {
        let mut display = Ssd1306::new(MockPanel::new());
        assert_eq!(
            display.draw_page(8, 0, &[1]),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_clear_page_and_clear_all() {
        let mut display = Ssd1306::new(MockPanel::new());
        display.draw_page(5, 0, &[0xFF; 128]).unwrap();
        display.draw_page(6, 0, &[0xFF; 128]).unwrap();

        display.clear_page(5, 100, 10).unwrap();
        let panel = display.release();
        assert!(panel.ram[5][100..110].iter().all(|&b| b == 0));
        assert_eq!(panel.ram[5][110], 0xFF);

        let mut display = Ssd1306::new(panel);
        display.clear_all().unwrap();
        let panel = display.release();
        assert!(panel.ram.iter().flatten().all(|&b| b == 0));
    }

    #[test]
    fn test_line_helpers_through_driver() {
        let mut display = Ssd1306::new(MockPanel::new());
        display.draw_line_v(7, 4, 10).unwrap();

        let panel = display.release();
        assert_eq!(panel.ram[0][7], 0xF0);
        assert_eq!(panel.ram[1][7], 0x3F);
    }

    #[test]
    fn test_bus_error_maps_to_communication() {
        let mut panel = MockPanel::new();
        panel.fail = true;
        let mut display = Ssd1306::new(panel);
        assert_eq!(display.init(0xCF), Err(DisplayError::Communication));
        assert_eq!(
            display.draw_page(0, 0, &[1]),
            Err(DisplayError::Communication)
        );
    }
}
