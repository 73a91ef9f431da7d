//! Board-agnostic core logic for the Aerolog environmental monitor
//!
//! This crate contains everything that does not touch hardware:
//!
//! - Seven-segment glyph rendering onto page-organized bitmaps
//! - Number fields, the trend chart and both screens
//! - The rolling sample store and reading filters
//! - The display transport trait
//! - Configuration types and the `monitor.toml` reader
//!
//! Nothing here holds a full frame buffer. Screens render one glyph cell or
//! one chart column at a time and push it through a [`PageTransport`].

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod chart;
pub mod config;
pub mod filter;
pub mod glyph;
pub mod input;
pub mod layout;
pub mod monitor;
pub mod number;
pub mod printer;
pub mod raster;
pub mod screen;
pub mod sensor;
pub mod store;
pub mod transport;

pub use monitor::Monitor;
pub use transport::{DisplayError, PageTransport};
