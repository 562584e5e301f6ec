use heapless::String;
use ufmt::uwrite;

/// Day names, indexed by day-of-week - 1 (1 = Sunday)
const DAYS_OF_THE_WEEK: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month names, indexed by month - 1 (1 = January)
const MONTHS_OF_THE_YEAR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// "Sun Mar 07 2024"
pub const DATE_LEN: usize = 15;
/// "09:05"
pub const TIME_LEN: usize = 5;

/// A consistent set of calendar fields read from the clock in one go.
/// Day-of-week and month are 1-based like the RTC registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day_of_week: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub year: u16,
}

impl Default for ClockSnapshot {
    fn default() -> Self {
        // 00:00:00 Saturday Jan 1 2000
        ClockSnapshot {
            second: 0,
            minute: 0,
            hour: 0,
            day_of_week: 7,
            day_of_month: 1,
            month: 1,
            year: 2000,
        }
    }
}

impl ClockSnapshot {
    /// Checks every field against its calendar range, including leap years
    pub fn is_valid(&self) -> bool {
        (1..=7).contains(&self.day_of_week)
            && (1..=12).contains(&self.month)
            && self.day_of_month >= 1
            && self.day_of_month <= days_in_month(self.month, self.year)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
            && self.year <= 9999
    }
}

/// Calculates if it is leap year
/// param year: The current year
pub fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Gets the amount of days in a 1-based month
/// Returns 0 for months outside 1..=12
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        _ => 0,
    }
}

/// Pads a number with a zero before it if < 10
/// NOTE: Only supports values <100
fn pad_number(num: u8) -> String<2> {
    let mut padded = String::new();
    if num < 10 {
        let _ = uwrite!(padded, "0{}", num);
    } else {
        let _ = uwrite!(padded, "{}", num);
    }
    padded
}

/// Formats the date as "<Dow> <Mon> <DD> <YYYY>"
/// Out of range day-of-week or month render as "???" instead of indexing past the tables
pub fn format_date(snapshot: &ClockSnapshot) -> String<DATE_LEN> {
    let day_name = lookup(&DAYS_OF_THE_WEEK, snapshot.day_of_week);
    let month_name = lookup(&MONTHS_OF_THE_YEAR, snapshot.month);
    let mut date: String<DATE_LEN> = String::new();
    let _ = uwrite!(
        date,
        "{} {} {} {}",
        day_name,
        month_name,
        pad_number(snapshot.day_of_month).as_str(),
        snapshot.year
    );
    date
}

/// Formats the time as "HH:MM"
pub fn format_time(snapshot: &ClockSnapshot) -> String<TIME_LEN> {
    let mut time: String<TIME_LEN> = String::new();
    let _ = uwrite!(
        time,
        "{}:{}",
        pad_number(snapshot.hour).as_str(),
        pad_number(snapshot.minute).as_str()
    );
    time
}

/// 1-based table lookup
fn lookup(table: &[&'static str], one_based: u8) -> &'static str {
    usize::from(one_based)
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .unwrap_or("???")
}

/// The battery-backed clock chip.
pub trait RealTimeClock {
    type Error;

    /// Latches the current time into the accessors below
    fn refresh(&mut self) -> Result<(), Self::Error>;

    fn second(&self) -> u8;
    fn minute(&self) -> u8;
    fn hour(&self) -> u8;
    /// 1 = Sunday .. 7 = Saturday
    fn day_of_week(&self) -> u8;
    fn day(&self) -> u8;
    /// 1 = January .. 12 = December
    fn month(&self) -> u8;
    fn year(&self) -> u16;

    /// Provisions the chip with a new date and time
    fn set(&mut self, time: &ClockSnapshot) -> Result<(), Self::Error>;
}

/// Why a refresh did not produce a new snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockUnavailable {
    /// The chip did not answer
    Bus,
    /// The chip answered with fields outside the calendar
    InvalidRegisters,
}

/// Wraps a [`RealTimeClock`] and keeps the last good snapshot.
///
/// Clock values may go stale when the chip is unreachable. Unlike climate
/// values there is no safe placeholder for a missing date, so the last good
/// snapshot keeps being shown.
pub struct ClockSource<C> {
    rtc: C,
    snapshot: ClockSnapshot,
}

impl<C: RealTimeClock> ClockSource<C> {
    pub fn new(rtc: C) -> Self {
        Self {
            rtc,
            snapshot: ClockSnapshot::default(),
        }
    }

    /// Re-reads the chip. On failure the cached snapshot is kept and the
    /// reason is returned next to it.
    pub fn refresh(&mut self) -> (ClockSnapshot, Result<(), ClockUnavailable>) {
        let status = self.try_refresh();
        if let Err(reason) = status {
            warn!("clock unavailable ({}), keeping last snapshot", reason);
        }
        (self.snapshot, status)
    }

    fn try_refresh(&mut self) -> Result<(), ClockUnavailable> {
        self.rtc.refresh().map_err(|_| ClockUnavailable::Bus)?;
        let fresh = ClockSnapshot {
            second: self.rtc.second(),
            minute: self.rtc.minute(),
            hour: self.rtc.hour(),
            day_of_week: self.rtc.day_of_week(),
            day_of_month: self.rtc.day(),
            month: self.rtc.month(),
            year: self.rtc.year(),
        };
        if !fresh.is_valid() {
            return Err(ClockUnavailable::InvalidRegisters);
        }
        self.snapshot = fresh;
        Ok(())
    }

    /// Writes a new time to the chip and adopts it as the current snapshot
    pub fn set(&mut self, time: ClockSnapshot) -> Result<(), ClockUnavailable> {
        if !time.is_valid() {
            return Err(ClockUnavailable::InvalidRegisters);
        }
        self.rtc.set(&time).map_err(|_| ClockUnavailable::Bus)?;
        self.snapshot = time;
        info!("clock set to {}-{}-{}", time.year, time.month, time.day_of_month);
        Ok(())
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        self.snapshot
    }

    /// Current seconds of the last good snapshot
    pub fn seconds(&self) -> u8 {
        self.snapshot.second
    }

    pub fn rtc(&self) -> &C {
        &self.rtc
    }

    pub fn rtc_mut(&mut self) -> &mut C {
        &mut self.rtc
    }
}
