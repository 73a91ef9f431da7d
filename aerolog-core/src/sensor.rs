//! Sensor readings and sensor traits

/// Errors reported by sensor drivers
///
/// These never reach the display: a failed read becomes a missing value for
/// the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No response within the allotted time
    Timeout,
    /// Frame checksum mismatch
    Checksum,
    /// Bus or pin level error
    Bus,
    /// Reading outside the sensor's physical range
    OutOfRange,
    /// Unexpected frame header or length
    Protocol,
}

/// Temperature and relative humidity, in tenths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Climate {
    /// Temperature in 0.1 °C
    pub temperature_x10: i16,
    /// Relative humidity in 0.1 %
    pub humidity_x10: u16,
}

/// Combined temperature / humidity sensor
pub trait ClimateSensor {
    /// Trigger a measurement and read the result
    fn read(&mut self) -> Result<Climate, SensorError>;
}

/// Latest value of every measured quantity
///
/// `None` means the last read failed or nothing has been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readings {
    pub co2_ppm: Option<u16>,
    /// Temperature in 0.1 °C
    pub temperature_x10: Option<i16>,
    /// Relative humidity in 0.1 %
    pub humidity_x10: Option<u16>,
    /// Supply voltage in millivolts
    pub supply_mv: Option<u16>,
}

impl Readings {
    /// Fill the climate fields from a sensor result
    pub fn set_climate(&mut self, climate: Result<Climate, SensorError>) {
        let climate = climate.ok();
        self.temperature_x10 = climate.map(|c| c.temperature_x10);
        self.humidity_x10 = climate.map(|c| c.humidity_x10);
    }

    /// Temperature in whole degrees, rounded toward zero
    pub fn temperature_c(&self) -> Option<i16> {
        self.temperature_x10.map(|t| t / 10)
    }

    /// Relative humidity in whole percent
    pub fn humidity_pct(&self) -> Option<i16> {
        self.humidity_x10.map(|h| (h / 10) as i16)
    }

    pub fn co2(&self) -> Option<i16> {
        self.co2_ppm.map(|ppm| ppm.min(i16::MAX as u16) as i16)
    }

    /// Supply voltage in hundredths of a volt
    pub fn supply_cv(&self) -> Option<i16> {
        self.supply_mv.map(|mv| (mv / 10) as i16)
    }
}
