//! Main screen: large live readings

use crate::glyph::Symbol;
use crate::layout::{
    FieldRect, LABEL_GLYPH, LARGE_GLYPH, MAIN_CO2, MAIN_HUMIDITY, MAIN_MARKER, MAIN_TEMPERATURE,
};
use crate::number::NumberField;
use crate::printer::GlyphPrinter;
use crate::transport::{DisplayError, PageTransport};

use super::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Co2,
    Marker,
    Temperature,
    Humidity,
}

impl Slot {
    const ALL: [Slot; 4] = [Slot::Co2, Slot::Marker, Slot::Temperature, Slot::Humidity];

    fn rect(self) -> FieldRect {
        match self {
            Slot::Co2 => MAIN_CO2,
            Slot::Marker => MAIN_MARKER,
            Slot::Temperature => MAIN_TEMPERATURE,
            Slot::Humidity => MAIN_HUMIDITY,
        }
    }

    fn unit(self) -> Symbol {
        match self {
            Slot::Co2 => Symbol::P,
            Slot::Marker => Symbol::U,
            Slot::Temperature => Symbol::C,
            Slot::Humidity => Symbol::H,
        }
    }
}

/// CO2, supply voltage, temperature and humidity in large digits
///
/// Remembers the value last drawn in each field and skips fields that have
/// not changed. The top-right marker shows the supply voltage in centivolts
/// unless an input code has overridden it.
pub struct MainScreen {
    large: GlyphPrinter,
    label: GlyphPrinter,
    fields: [NumberField; 4],
    shown: [Option<i16>; 4],
    override_value: Option<i16>,
    redraw_pending: bool,
}

impl Default for MainScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MainScreen {
    pub fn new() -> Self {
        Self {
            large: GlyphPrinter::new(LARGE_GLYPH),
            label: GlyphPrinter::new(LABEL_GLYPH),
            fields: Slot::ALL.map(|slot| NumberField::new(slot.rect())),
            shown: [None; 4],
            override_value: None,
            redraw_pending: false,
        }
    }

    pub fn draw<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        view: View<'_>,
        force: bool,
    ) -> Result<(), DisplayError> {
        if force {
            self.shown = [None; 4];
            self.redraw_pending = false;
        }

        let readings = view.readings;
        let marker = self.override_value.or(readings.supply_cv());

        for (i, slot) in Slot::ALL.into_iter().enumerate() {
            let value = match slot {
                Slot::Co2 => readings.co2(),
                Slot::Marker => marker,
                Slot::Temperature => readings.temperature_c(),
                Slot::Humidity => readings.humidity_pct(),
            }
            .unwrap_or(0);

            if self.shown[i] == Some(value) {
                continue;
            }

            let field = &self.fields[i];
            match slot {
                // The marker is drawn in label-sized digits
                Slot::Marker => {
                    field.set_number(transport, &mut self.label, None, value, slot.unit())?
                }
                _ => field.set_number(
                    transport,
                    &mut self.large,
                    Some(&mut self.label),
                    value,
                    slot.unit(),
                )?,
            }
            self.shown[i] = Some(value);
        }

        Ok(())
    }

    /// Show `code` in the marker field in place of the supply voltage
    pub fn input(&mut self, code: u8) {
        self.override_value = Some(code as i16);
        self.redraw_pending = true;
    }

    /// Latched until the next forced draw
    pub fn need_redraw(&self) -> bool {
        self.redraw_pending
    }
}
