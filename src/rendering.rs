use heapless::String;
use ufmt::uwrite;

use crate::climate::Reading;
use crate::datetime::{format_date, format_time, ClockSnapshot};

/// Widest line the formatter will produce (HD44780 limit)
pub const MAX_COLUMNS: usize = 40;
/// Rows on the reference 1602 panel
pub const LCD_ROWS: u8 = 2;
/// Columns on the reference 1602 panel
pub const LCD_COLUMNS: u8 = 16;

/// Shown in place of a value the sensor could not deliver
const PLACEHOLDER: &str = "--";

pub type Line = String<MAX_COLUMNS>;

/// Character display wired to the board.
pub trait CharacterDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;
    fn print(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// The two lines sent to the display for one cycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayFrame {
    pub line1: Line,
    pub line2: Line,
}

impl DisplayFrame {
    /// Lines in panel row order
    pub fn rows(&self) -> [&str; LCD_ROWS as usize] {
        [self.line1.as_str(), self.line2.as_str()]
    }
}

/// Composes climate and clock state into display lines clipped to `columns`
#[derive(Clone, Copy, Debug)]
pub struct DisplayFormatter {
    columns: usize,
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new(LCD_COLUMNS)
    }
}

impl DisplayFormatter {
    pub fn new(columns: u8) -> Self {
        Self {
            columns: usize::from(columns).min(MAX_COLUMNS),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn format(&self, reading: &Reading, snapshot: &ClockSnapshot) -> DisplayFrame {
        DisplayFrame {
            line1: self.climate_line(reading),
            line2: self.clock_line(snapshot),
        }
    }

    /// "<T>C <H>%", or "--C --%" when the reading failed
    pub fn climate_line(&self, reading: &Reading) -> Line {
        let mut line: String<24> = String::new();
        match (reading.temperature_celsius(), reading.humidity_percent()) {
            (Some(temperature), Some(humidity)) if reading.is_ok() => {
                let _ = uwrite!(line, "{}C {}%", temperature, humidity);
            }
            // Both fields or neither
            _ => {
                let _ = uwrite!(line, "{}C {}%", PLACEHOLDER, PLACEHOLDER);
            }
        }
        clip(&line, self.columns)
    }

    /// "<Dow> <Mon> <DD> <YYYY> <HH:MM>" when it fits, otherwise the year is
    /// dropped: "<Dow> <Mon> <DD> <HH:MM>"
    pub fn clock_line(&self, snapshot: &ClockSnapshot) -> Line {
        let date = format_date(snapshot);
        let time = format_time(snapshot);
        let mut line: String<32> = String::new();
        if date.len() + 1 + time.len() <= self.columns {
            let _ = uwrite!(line, "{} {}", date.as_str(), time.as_str());
        } else {
            // "Sun Mar 07" is the first 10 characters of the date
            let short = date.get(..10).unwrap_or(date.as_str());
            let _ = uwrite!(line, "{} {}", short, time.as_str());
        }
        clip(&line, self.columns)
    }
}

/// Copies `text` cutting it at `columns` characters. Never wraps.
fn clip(text: &str, columns: usize) -> Line {
    let mut line = Line::new();
    for c in text.chars().take(columns) {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

/// Clears the panel and writes both lines, top first
pub fn render_frame<D: CharacterDisplay>(
    display: &mut D,
    frame: &DisplayFrame,
) -> Result<(), D::Error> {
    display.clear()?;
    for (row, line) in (0..LCD_ROWS).zip(frame.rows()) {
        render_line(display, line, row)?;
    }
    Ok(())
}

/// Writes one line starting at column 0 of `row`
pub fn render_line<D: CharacterDisplay>(
    display: &mut D,
    line: &str,
    row: u8,
) -> Result<(), D::Error> {
    display.set_cursor(0, row)?;
    display.print(line)
}
