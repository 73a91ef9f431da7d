//! MH-Z19 NDIR CO2 sensor
//!
//! The sensor talks 9600 8N1 over UART with fixed 9-byte frames:
//!
//! ```text
//! request:  FF 01 CMD a0 a1 a2 a3 a4 CS
//! response: FF CMD HH LL .. .. .. .. CS
//! ```
//!
//! `CS` is the two's complement of the sum of bytes 1..=7.
//!
//! A read cancelled mid-frame leaves the rest of the answer in the UART
//! buffer. Pending bytes are discarded before each request and the reply is
//! located by its `FF 86` header, so the stream is back in step after one
//! failed cycle.

use aerolog_core::sensor::SensorError;
use embedded_io_async::{Read, ReadExactError, ReadReady, Write};

/// Frame length in both directions
pub const FRAME_LEN: usize = 9;

/// Highest concentration the 0-10000 ppm variant reports
pub const MAX_PPM: u16 = 10_000;

const START: u8 = 0xFF;
const SENSOR_ID: u8 = 0x01;

/// Bytes skipped while looking for a reply header before giving up
const MAX_SKIP: usize = 2 * FRAME_LEN;

mod cmd {
    pub const READ_CO2: u8 = 0x86;
    pub const AUTO_CALIBRATION: u8 = 0x79;
}

/// Checksum over bytes 1..=7 of a frame
pub fn checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    let sum = frame[1..8].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0xFFu8.wrapping_sub(sum).wrapping_add(1)
}

/// Build a request frame
pub fn request(command: u8, args: [u8; 5]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = START;
    frame[1] = SENSOR_ID;
    frame[2] = command;
    frame[3..8].copy_from_slice(&args);
    frame[8] = checksum(&frame);
    frame
}

/// Extract the concentration from a read response
pub fn parse_co2_response(frame: &[u8; FRAME_LEN]) -> Result<u16, SensorError> {
    if frame[0] != START || frame[1] != cmd::READ_CO2 {
        return Err(SensorError::Protocol);
    }
    if checksum(frame) != frame[8] {
        return Err(SensorError::Checksum);
    }

    let ppm = u16::from_be_bytes([frame[2], frame[3]]);
    if ppm > MAX_PPM {
        return Err(SensorError::OutOfRange);
    }
    Ok(ppm)
}

/// MH-Z19 driver over an async UART
///
/// Reads have no timeout of their own; wrap them in one at the call site.
pub struct Mhz19<U> {
    uart: U,
}

impl<U: Read + ReadReady + Write> Mhz19<U> {
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Request and read the current CO2 concentration in ppm
    pub async fn read_co2(&mut self) -> Result<u16, SensorError> {
        self.discard_pending().await?;
        self.send(request(cmd::READ_CO2, [0; 5])).await?;

        let frame = self.read_reply(cmd::READ_CO2).await?;
        parse_co2_response(&frame)
    }

    /// Enable or disable the sensor's automatic baseline correction
    pub async fn set_auto_calibration(&mut self, enabled: bool) -> Result<(), SensorError> {
        let flag = if enabled { 0xA0 } else { 0x00 };
        self.send(request(cmd::AUTO_CALIBRATION, [flag, 0, 0, 0, 0]))
            .await
    }

    /// Drop whatever is already buffered, e.g. the tail of a late reply
    async fn discard_pending(&mut self) -> Result<(), SensorError> {
        let mut scratch = [0u8; FRAME_LEN];
        while self.uart.read_ready().map_err(|_| SensorError::Bus)? {
            let n = self
                .uart
                .read(&mut scratch)
                .await
                .map_err(|_| SensorError::Bus)?;
            if n == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Skip to the `FF <command>` header, then read the rest of the frame
    async fn read_reply(&mut self, command: u8) -> Result<[u8; FRAME_LEN], SensorError> {
        let mut frame = [0u8; FRAME_LEN];
        let mut previous = None;
        let mut skipped = 0;

        loop {
            let mut byte = [0u8; 1];
            self.uart.read_exact(&mut byte).await.map_err(read_error)?;
            if previous == Some(START) && byte[0] == command {
                break;
            }
            if previous.is_some() {
                skipped += 1;
                if skipped > MAX_SKIP {
                    return Err(SensorError::Protocol);
                }
            }
            previous = Some(byte[0]);
        }

        frame[0] = START;
        frame[1] = command;
        self.uart
            .read_exact(&mut frame[2..])
            .await
            .map_err(read_error)?;
        Ok(frame)
    }

    async fn send(&mut self, frame: [u8; FRAME_LEN]) -> Result<(), SensorError> {
        self.uart
            .write_all(&frame)
            .await
            .map_err(|_| SensorError::Bus)?;
        self.uart.flush().await.map_err(|_| SensorError::Bus)
    }
}

fn read_error<E>(e: ReadExactError<E>) -> SensorError {
    match e {
        ReadExactError::UnexpectedEof => SensorError::Protocol,
        ReadExactError::Other(_) => SensorError::Bus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_io_async::{ErrorKind, ErrorType};
    use std::vec::Vec;

    /// UART double
    ///
    /// `rx` holds bytes already received. Each request frame written moves
    /// the next entry of `replies` into `rx`, as the sensor would answer.
    struct MockUart {
        written: Vec<u8>,
        rx: Vec<u8>,
        replies: Vec<Vec<u8>>,
    }

    impl MockUart {
        fn new(pending: &[u8], replies: &[&[u8]]) -> Self {
            Self {
                written: Vec::new(),
                rx: pending.to_vec(),
                replies: replies.iter().rev().map(|r| r.to_vec()).collect(),
            }
        }

        fn replying(response: &[u8]) -> Self {
            Self::new(&[], &[response])
        }
    }

    impl ErrorType for MockUart {
        type Error = ErrorKind;
    }

    impl Read for MockUart {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.rx.len());
            buf[..n].copy_from_slice(&self.rx[..n]);
            self.rx.drain(..n);
            Ok(n)
        }
    }

    impl ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for MockUart {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.written.extend_from_slice(buf);
            if self.written.len() % FRAME_LEN == 0 {
                if let Some(reply) = self.replies.pop() {
                    self.rx.extend_from_slice(&reply);
                }
            }
            Ok(buf.len())
        }
    }

    fn response(ppm: u16) -> [u8; FRAME_LEN] {
        let [hi, lo] = ppm.to_be_bytes();
        let mut frame = [START, cmd::READ_CO2, hi, lo, 0x47, 0x00, 0x00, 0x00, 0x00];
        frame[8] = checksum(&frame);
        frame
    }

    #[test]
    fn test_read_request_frame() {
        assert_eq!(
            request(cmd::READ_CO2, [0; 5]),
            [0xFF, 0x01, 0x86, 0x00, 0x00, 0x00, 0x00, 0x00, 0x79]
        );
    }

    #[test]
    fn test_parse_known_response() {
        // 0x02 0x60 = 608 ppm
        let frame = [0xFF, 0x86, 0x02, 0x60, 0x47, 0x00, 0x00, 0x00, 0xD1];
        assert_eq!(parse_co2_response(&frame), Ok(608));
    }

    #[test]
    fn test_parse_rejects_bad_frames() {
        let mut frame = response(800);
        frame[8] ^= 1;
        assert_eq!(parse_co2_response(&frame), Err(SensorError::Checksum));

        let mut frame = response(800);
        frame[1] = 0x87;
        assert_eq!(parse_co2_response(&frame), Err(SensorError::Protocol));

        assert_eq!(
            parse_co2_response(&response(20_000)),
            Err(SensorError::OutOfRange)
        );
    }

    #[test]
    fn test_read_co2_round_trip() {
        let mut sensor = Mhz19::new(MockUart::replying(&response(1234)));
        assert_eq!(block_on(sensor.read_co2()), Ok(1234));
        assert_eq!(sensor.uart.written, request(cmd::READ_CO2, [0; 5]));
    }

    #[test]
    fn test_short_response_is_protocol_error() {
        let mut sensor = Mhz19::new(MockUart::replying(&[0xFF, 0x86, 0x02]));
        assert_eq!(block_on(sensor.read_co2()), Err(SensorError::Protocol));
    }

    #[test]
    fn test_late_tail_before_reply_is_skipped() {
        // The tail of a cancelled reply arrives just ahead of the next answer
        let mut first: Vec<u8> = std::vec![0x47, 0x00, 0x00, 0x00];
        first.extend_from_slice(&response(700));
        let (r710, r720, r730) = (response(710), response(720), response(730));
        let replies = [&first[..], &r710[..], &r720[..], &r730[..]];
        let mut sensor = Mhz19::new(MockUart::new(&[], &replies));

        let readings: Vec<_> = (0..4).map(|_| block_on(sensor.read_co2())).collect();
        assert_eq!(readings, [Ok(700), Ok(710), Ok(720), Ok(730)]);
    }

    #[test]
    fn test_stale_bytes_are_discarded_before_request() {
        // A whole late frame plus a partial one sit in the buffer
        let mut stale: Vec<u8> = response(999).to_vec();
        stale.extend_from_slice(&[0xFF, 0x86, 0x03]);
        let fresh = response(640);
        let mut sensor = Mhz19::new(MockUart::new(&stale, &[&fresh[..]]));

        assert_eq!(block_on(sensor.read_co2()), Ok(640));
    }

    #[test]
    fn test_garbage_without_header_gives_up() {
        let noise = [0x12u8; 3 * FRAME_LEN];
        let mut sensor = Mhz19::new(MockUart::replying(&noise));
        assert_eq!(block_on(sensor.read_co2()), Err(SensorError::Protocol));
    }

    #[test]
    fn test_auto_calibration_frames() {
        let mut sensor = Mhz19::new(MockUart::new(&[], &[]));
        block_on(sensor.set_auto_calibration(false)).unwrap();
        assert_eq!(
            sensor.uart.written,
            [0xFF, 0x01, 0x79, 0x00, 0x00, 0x00, 0x00, 0x00, 0x86]
        );
    }
}
