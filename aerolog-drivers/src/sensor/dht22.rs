//! DHT22 (AM2302) temperature / humidity sensor
//!
//! Single-wire protocol on an open-drain pin with pull-up:
//!
//! 1. Host pulls the line low for at least 1 ms, then releases it
//! 2. Sensor answers with 80 µs low, 80 µs high
//! 3. 40 data bits follow, each a 50 µs low gap then a high pulse of
//!    26-28 µs for `0` or 70 µs for `1`
//!
//! Frame: humidity ×10 (16 bit), temperature ×10 (15 bit magnitude, bit 15
//! is the sign), checksum = low byte of the sum of the four data bytes.
//!
//! Phases are timed by counting 1 µs polls. Pin access and delay overhead
//! stretch each poll, so a bit is classified by comparing its high pulse with
//! the 50 µs low gap before it rather than against a fixed count. The sensor
//! needs 2 s between reads.

use aerolog_core::sensor::{Climate, ClimateSensor, SensorError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Frame length in bytes
pub const FRAME_LEN: usize = 5;

/// Host start pulse
const START_PULSE_MS: u32 = 2;

/// Polls after which a line phase has lasted too long (at least 100 µs)
const PHASE_TIMEOUT_POLLS: u32 = 100;

/// Physical range of the sensor
const HUMIDITY_MAX_X10: u16 = 1000;
const TEMPERATURE_RANGE_X10: core::ops::RangeInclusive<i16> = -400..=800;

/// Decode and validate a 5-byte frame
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<Climate, SensorError> {
    // A line stuck low reads as all zeros, which would pass the checksum
    if frame.iter().all(|&b| b == 0) {
        return Err(SensorError::Protocol);
    }

    let sum = frame[..4].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity_x10 = u16::from_be_bytes([frame[0], frame[1]]);
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as i16;
    let temperature_x10 = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if humidity_x10 > HUMIDITY_MAX_X10 || !TEMPERATURE_RANGE_X10.contains(&temperature_x10) {
        return Err(SensorError::OutOfRange);
    }

    Ok(Climate {
        temperature_x10,
        humidity_x10,
    })
}

/// DHT22 driver
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// `pin` must be open-drain with the line pulled up
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(START_PULSE_MS);
        self.pin.set_high().map_err(|_| SensorError::Bus)?;

        // Response: wait for the sensor to take the line, then its 80/80 µs ack
        self.wait_for(false)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; FRAME_LEN];
        for bit in 0..FRAME_LEN * 8 {
            let low = self.wait_for(true)?;
            let high = self.wait_for(false)?;
            if high > low {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Wait until the line reads `high`; returns the number of polls taken
    fn wait_for(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut polls = 0;
        while self.pin.is_high().map_err(|_| SensorError::Bus)? != high {
            if polls >= PHASE_TIMEOUT_POLLS {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            polls += 1;
        }
        Ok(polls)
    }
}

impl<P, D> ClimateSensor for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read(&mut self) -> Result<Climate, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::rc::Rc;
    use std::vec::Vec;

    /// Microsecond clock shared by the pin and delay doubles
    type Clock = Rc<Cell<u32>>;

    /// Line driven by a scripted sensor once the host releases it
    struct ScriptedLine {
        clock: Clock,
        released_at: Option<u32>,
        /// (level, duration µs) after release; idle high afterwards
        script: Vec<(bool, u32)>,
    }

    impl ErrorType for ScriptedLine {
        type Error = ErrorKind;
    }

    impl OutputPin for ScriptedLine {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.released_at = None;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.released_at = Some(self.clock.get());
            Ok(())
        }
    }

    impl InputPin for ScriptedLine {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let Some(start) = self.released_at else {
                return Ok(false);
            };
            let mut t = self.clock.get() - start;
            for &(level, duration) in &self.script {
                if t < duration {
                    return Ok(level);
                }
                t -= duration;
            }
            Ok(true)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    /// Delay that also charges `overhead_us` per call, like a real poll loop
    struct FakeDelay {
        clock: Clock,
        overhead_us: u32,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            let spent = ns.div_ceil(1000) + self.overhead_us;
            self.clock.set(self.clock.get() + spent);
        }
    }

    fn sensor_for(frame: &[u8; FRAME_LEN]) -> Dht22<ScriptedLine, FakeDelay> {
        sensor_with_overhead(frame, 0)
    }

    fn sensor_with_overhead(
        frame: &[u8; FRAME_LEN],
        overhead_us: u32,
    ) -> Dht22<ScriptedLine, FakeDelay> {
        let mut script = std::vec![(true, 30), (false, 80), (true, 80)];
        for bit in 0..FRAME_LEN * 8 {
            let one = frame[bit / 8] & (0x80 >> (bit % 8)) != 0;
            script.push((false, 50));
            script.push((true, if one { 70 } else { 26 }));
        }
        script.push((false, 50));

        let clock = Clock::default();
        let line = ScriptedLine {
            clock: clock.clone(),
            released_at: None,
            script,
        };
        Dht22::new(line, FakeDelay { clock, overhead_us })
    }

    #[test]
    fn test_decode_datasheet_frame() {
        // 65.2 %RH, 35.1 °C
        let climate = decode_frame(&[0x02, 0x8C, 0x01, 0x5F, 0xEE]).unwrap();
        assert_eq!(climate.humidity_x10, 652);
        assert_eq!(climate.temperature_x10, 351);
    }

    #[test]
    fn test_decode_negative_temperature() {
        // -10.1 °C
        let climate = decode_frame(&[0x02, 0x8C, 0x80, 0x65, 0x73]).unwrap();
        assert_eq!(climate.temperature_x10, -101);
    }

    #[test]
    fn test_decode_rejects_bad_checksum_and_range() {
        assert_eq!(
            decode_frame(&[0x02, 0x8C, 0x01, 0x5F, 0xEF]),
            Err(SensorError::Checksum)
        );
        // 110.0 %RH
        assert_eq!(
            decode_frame(&[0x04, 0x4C, 0x00, 0x00, 0x50]),
            Err(SensorError::OutOfRange)
        );
    }

    #[test]
    fn test_read_scripted_sensor() {
        let mut sensor = sensor_for(&[0x02, 0x8C, 0x01, 0x5F, 0xEE]);
        let climate = sensor.read().unwrap();
        assert_eq!(climate.humidity_x10, 652);
        assert_eq!(climate.temperature_x10, 351);
    }

    #[test]
    fn test_silent_sensor_times_out() {
        let clock = Clock::default();
        let line = ScriptedLine {
            clock: clock.clone(),
            released_at: None,
            script: Vec::new(),
        };
        let delay = FakeDelay {
            clock,
            overhead_us: 0,
        };
        let mut sensor = Dht22::new(line, delay);
        assert_eq!(sensor.read(), Err(SensorError::Timeout));
    }

    #[test]
    fn test_all_zero_frame_is_rejected() {
        assert_eq!(decode_frame(&[0; FRAME_LEN]), Err(SensorError::Protocol));
    }

    #[test]
    fn test_slow_polling_still_decodes_bits() {
        // Each poll costs 3 µs: a 70 µs `1` pulse counts ~24 polls, the
        // 50 µs gap before it ~17, a 26 µs `0` pulse ~9
        let mut sensor = sensor_with_overhead(&[0x02, 0x8C, 0x01, 0x5F, 0xEE], 2);
        let climate = sensor.read().unwrap();
        assert_eq!(climate.humidity_x10, 652);
        assert_eq!(climate.temperature_x10, 351);
    }
}
