//! Rolling sample store
//!
//! A fixed ring of 3-channel samples, one per chart column. Samples are
//! scaled to a byte per channel; `0` means "no data" and is skipped when
//! computing the channel minimum.

/// Number of slots in the ring
pub const STORE_CAPACITY: usize = 128;

/// Number of channels per sample
pub const CHANNELS: usize = 3;

/// Sample value meaning "no reading"
pub const NO_DATA: u8 = 0;

/// Logged channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// CO2 concentration, stored as ppm / 20
    Co2 = 0,
    /// Temperature, stored as °C + 50
    Temperature = 1,
    /// Relative humidity, stored as %
    Humidity = 2,
}

impl Channel {
    pub const ALL: [Channel; CHANNELS] = [Channel::Co2, Channel::Temperature, Channel::Humidity];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Scale a reading in whole display units to a stored sample
    ///
    /// `None` stores [`NO_DATA`]. Valid readings clamp to `1..=255` so that a
    /// real reading never aliases the no-data marker.
    pub fn encode(self, value: Option<i32>) -> u8 {
        let Some(value) = value else {
            return NO_DATA;
        };
        let scaled = match self {
            Channel::Co2 => value / 20,
            Channel::Temperature => value + 50,
            Channel::Humidity => value,
        };
        scaled.clamp(1, u8::MAX as i32) as u8
    }

    /// Convert a stored sample back to whole display units
    pub fn decode(self, sample: u8) -> Option<i16> {
        if sample == NO_DATA {
            return None;
        }
        let sample = sample as i16;
        Some(match self {
            Channel::Co2 => sample * 20,
            Channel::Temperature => sample - 50,
            Channel::Humidity => sample,
        })
    }
}

/// Ring of the last [`STORE_CAPACITY`] logged samples
///
/// Slot `cursor` is the oldest sample and the next to be overwritten. Reads
/// are relative to the cursor: offset `0` is the oldest sample, `-1` the
/// newest.
#[derive(Debug, Clone)]
pub struct SampleStore {
    slots: [[u8; CHANNELS]; STORE_CAPACITY],
    cursor: usize,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleStore {
    pub const fn new() -> Self {
        Self {
            slots: [[NO_DATA; CHANNELS]; STORE_CAPACITY],
            cursor: 0,
        }
    }

    /// Write one sample at the cursor and advance it
    pub fn add_value(&mut self, c0: u8, c1: u8, c2: u8) {
        self.slots[self.cursor] = [c0, c1, c2];
        self.cursor = (self.cursor + 1) % STORE_CAPACITY;
    }

    /// Largest value of `channel` over all slots
    pub fn max(&self, channel: Channel) -> u8 {
        self.column(channel).max().unwrap_or(NO_DATA)
    }

    /// Smallest non-zero value of `channel`, or 0 if the channel is empty
    pub fn min(&self, channel: Channel) -> u8 {
        self.column(channel)
            .filter(|&v| v != NO_DATA)
            .min()
            .unwrap_or(NO_DATA)
    }

    /// Sample of `channel` at `offset` slots from the cursor
    ///
    /// Offsets wrap modulo the capacity, so any value is valid.
    pub fn last(&self, channel: Channel, offset: i16) -> u8 {
        let slot = (self.cursor as i32 + offset as i32).rem_euclid(STORE_CAPACITY as i32);
        self.slots[slot as usize][channel.index()]
    }

    fn column(&self, channel: Channel) -> impl Iterator<Item = u8> + '_ {
        self.slots.iter().map(move |slot| slot[channel.index()])
    }
}
