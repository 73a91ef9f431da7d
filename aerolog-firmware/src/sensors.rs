//! Board sensor set
//!
//! Bundles the three measurement sources so the monitor task can take one
//! [`Readings`] per poll. A failing sensor only blanks its own value.

use defmt::*;
use embassy_stm32::adc::{Adc, VrefInt};
use embassy_stm32::gpio::OutputOpenDrain;
use embassy_stm32::peripherals::ADC1;
use embassy_stm32::usart::BufferedUart;
use embassy_time::{with_timeout, Delay, Duration};

use aerolog_core::sensor::{ClimateSensor, Readings};
use aerolog_drivers::sensor::supply::supply_mv_calibrated;
use aerolog_drivers::sensor::{Dht22, Mhz19};

/// A 9-byte answer at 9600 baud takes ~10 ms; the sensor replies within 100 ms
const CO2_TIMEOUT: Duration = Duration::from_millis(200);

/// Factory VREFINT reading at 3.3 V, 30 °C (STM32F042 system memory)
const VREFINT_CAL_ADDR: usize = 0x1FFF_F7BA;

pub type Co2Sensor = Mhz19<BufferedUart<'static>>;
pub type ClimateProbe = Dht22<OutputOpenDrain<'static>, Delay>;

pub struct Sensors {
    co2: Co2Sensor,
    climate: ClimateProbe,
    adc: Adc<'static, ADC1>,
    vrefint: VrefInt,
    vrefint_cal: u16,
}

impl Sensors {
    pub fn new(co2: Co2Sensor, climate: ClimateProbe, adc: Adc<'static, ADC1>, vrefint: VrefInt) -> Self {
        let vrefint_cal = read_vrefint_cal();
        debug!("VREFINT_CAL = {}", vrefint_cal);
        Self {
            co2,
            climate,
            adc,
            vrefint,
            vrefint_cal,
        }
    }

    /// Read every sensor once
    pub async fn poll(&mut self) -> Readings {
        let mut readings = Readings::default();

        readings.co2_ppm = match with_timeout(CO2_TIMEOUT, self.co2.read_co2()).await {
            Ok(Ok(ppm)) => Some(ppm),
            Ok(Err(e)) => {
                warn!("CO2 read failed: {}", e);
                None
            }
            Err(_) => {
                warn!("CO2 sensor not answering");
                None
            }
        };

        let climate = self.climate.read();
        if let Err(e) = climate {
            warn!("DHT22 read failed: {}", e);
        }
        readings.set_climate(climate);

        let raw = self.adc.read(&mut self.vrefint).await;
        readings.supply_mv = supply_mv_calibrated(self.vrefint_cal, raw);

        trace!("Poll: {}", readings);
        readings
    }
}

fn read_vrefint_cal() -> u16 {
    // SAFETY: factory calibration word in read-only system memory
    unsafe { core::ptr::read_volatile(VREFINT_CAL_ADDR as *const u16) }
}
