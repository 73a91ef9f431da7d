//! Display drivers

pub mod ssd1306;

pub use ssd1306::Ssd1306;
