//! Sensor drivers

pub mod dht22;
pub mod mhz19;
pub mod supply;

pub use dht22::Dht22;
pub use mhz19::Mhz19;
