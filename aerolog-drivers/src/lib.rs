//! Hardware driver implementations
//!
//! Concrete drivers behind the interfaces defined in aerolog-core:
//!
//! - SSD1306 OLED as a [`PageTransport`](aerolog_core::PageTransport)
//! - MH-Z19 CO2 sensor (async UART)
//! - DHT22 temperature / humidity sensor (single-wire GPIO)
//! - Supply voltage from the ADC internal reference
//! - Quadrature encoder decoding

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod input;
pub mod sensor;
