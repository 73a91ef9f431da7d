//! Chart screen: trend chart with a browsable cursor

use crate::chart::TrendChart;
use crate::glyph::Symbol;
use crate::input::{CURSOR_BACK, CURSOR_FORWARD};
use crate::layout::{CHART_COLUMNS, CHART_SUMMARY, TINY_GLYPH};
use crate::number::NumberField;
use crate::printer::GlyphPrinter;
use crate::store::Channel;
use crate::transport::{DisplayError, PageTransport};

use super::View;

/// Summary field units, left to right
const SUMMARY_UNITS: [Symbol; 4] = [Symbol::C, Symbol::H, Symbol::P, Symbol::U];

/// Trend chart plus a one-page summary of the sample under the cursor
///
/// The summary shows temperature, humidity and CO2 logged at the cursor
/// column, followed by the live supply voltage.
pub struct ChartScreen {
    tiny: GlyphPrinter,
    fields: [NumberField; 4],
    chart: TrendChart,
    cursor: u8,
    redraw_pending: bool,
}

impl Default for ChartScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartScreen {
    /// Cursor starts on the newest column
    pub const START_CURSOR: u8 = CHART_COLUMNS as u8 - 1;

    pub fn new() -> Self {
        Self {
            tiny: GlyphPrinter::new(TINY_GLYPH),
            fields: CHART_SUMMARY.map(NumberField::new),
            chart: TrendChart::new(),
            cursor: Self::START_CURSOR,
            redraw_pending: false,
        }
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Always a full redraw; `force` has no effect
    pub fn draw<T: PageTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        view: View<'_>,
        _force: bool,
    ) -> Result<(), DisplayError> {
        let offset = self.cursor as i16;
        let logged = |channel: Channel| channel.decode(view.store.last(channel, offset));
        let values = [
            logged(Channel::Temperature),
            logged(Channel::Humidity),
            logged(Channel::Co2),
            view.readings.supply_cv(),
        ];

        for ((field, value), unit) in self.fields.iter().zip(values).zip(SUMMARY_UNITS) {
            field.set_number(transport, &mut self.tiny, None, value.unwrap_or(0), unit)?;
        }

        self.chart.draw(transport, view.store, Some(self.cursor))
    }

    /// Move the cursor one column back or forward, wrapping around
    pub fn input(&mut self, code: u8) {
        let columns = CHART_COLUMNS as u16;
        let cursor = self.cursor as u16;
        self.cursor = match code {
            CURSOR_BACK => ((cursor + columns - 1) % columns) as u8,
            CURSOR_FORWARD => ((cursor + 1) % columns) as u8,
            _ => return,
        };
        self.redraw_pending = true;
    }

    /// Reports and clears the pending flag
    pub fn need_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::Readings;
    use crate::store::SampleStore;
    use crate::transport::testing::RecordingTransport;

    #[test]
    fn test_cursor_wraps() {
        let mut screen = ChartScreen::new();
        assert_eq!(screen.cursor(), 127);

        screen.input(CURSOR_FORWARD);
        assert_eq!(screen.cursor(), 0);
        screen.input(CURSOR_BACK);
        assert_eq!(screen.cursor(), 127);
        screen.input(CURSOR_BACK);
        assert_eq!(screen.cursor(), 126);
    }

    #[test]
    fn test_need_redraw_clears_itself() {
        let mut screen = ChartScreen::new();
        assert!(!screen.need_redraw());

        screen.input(CURSOR_BACK);
        assert!(screen.need_redraw());
        assert!(!screen.need_redraw());
    }

    #[test]
    fn test_unknown_code_ignored() {
        let mut screen = ChartScreen::new();
        screen.input(9);
        assert_eq!(screen.cursor(), 127);
        assert!(!screen.need_redraw());
    }

    #[test]
    fn test_draw_is_always_full() {
        let mut t = RecordingTransport::new();
        let mut screen = ChartScreen::new();
        let store = SampleStore::new();
        let readings = Readings::default();
        let view = View {
            readings: &readings,
            store: &store,
        };

        screen.draw(&mut t, view, false).unwrap();
        let first = t.ops();

        t.reset_counts();
        screen.draw(&mut t, view, false).unwrap();
        assert_eq!(t.ops(), first);
        // Four summary fields on page 0 plus every chart column
        assert_eq!(t.clears, 4);
        assert!(t.draws >= 128 * 7);
    }

    #[test]
    fn test_force_flag_is_ignored() {
        let mut store = SampleStore::new();
        for i in 0..40u8 {
            store.add_value(20 + i, 60, 45);
        }
        let readings = Readings {
            supply_mv: Some(3_900),
            ..Readings::default()
        };
        let view = View {
            readings: &readings,
            store: &store,
        };

        let mut plain = RecordingTransport::new();
        let mut screen = ChartScreen::new();
        screen.draw(&mut plain, view, false).unwrap();

        let mut forced = RecordingTransport::new();
        let mut screen = ChartScreen::new();
        screen.draw(&mut forced, view, true).unwrap();

        assert_eq!(forced.draws, plain.draws);
        assert_eq!(forced.clears, plain.clears);
        assert_eq!(forced.frame, plain.frame);
    }

    #[test]
    fn test_summary_follows_cursor() {
        let mut store = SampleStore::new();
        for i in 0..128u8 {
            let humidity = if i == 126 { 42 } else { 80 };
            store.add_value(37, 38, humidity);
        }
        let readings = Readings {
            supply_mv: Some(4_100),
            ..Readings::default()
        };
        let view = View {
            readings: &readings,
            store: &store,
        };

        let mut at_newest = RecordingTransport::new();
        let mut screen = ChartScreen::new();
        screen.draw(&mut at_newest, view, false).unwrap();

        screen.input(CURSOR_BACK);
        let mut at_126 = RecordingTransport::new();
        screen.draw(&mut at_126, view, false).unwrap();

        // Humidity field (x 32..64) differs, temperature field does not
        assert_ne!(&at_newest.frame[0][32..64], &at_126.frame[0][32..64]);
        assert_eq!(&at_newest.frame[0][..32], &at_126.frame[0][..32]);
    }
}
