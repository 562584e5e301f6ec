//! Adapters for the chips on the reference board

use ds323x::{DateTimeAccess, Datelike, NaiveDate, Timelike};

use crate::datetime::{ClockSnapshot, RealTimeClock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// I2C transaction failed
    Bus,
    /// Date could not be represented by the chip or the snapshot
    OutOfRange,
}

/// DS3231 (or any `rtcc` clock) behind the [`RealTimeClock`] accessors.
/// Day-of-week is derived from the date, so it cannot drift from it.
pub struct Ds3231Clock<R> {
    rtc: R,
    latched: ClockSnapshot,
}

impl<R: DateTimeAccess> Ds3231Clock<R> {
    pub fn new(rtc: R) -> Self {
        Self {
            rtc,
            latched: ClockSnapshot::default(),
        }
    }
}

impl<R: DateTimeAccess> RealTimeClock for Ds3231Clock<R> {
    type Error = RtcError;

    fn refresh(&mut self) -> Result<(), RtcError> {
        let now = self.rtc.datetime().map_err(|_| RtcError::Bus)?;
        let year = u16::try_from(now.year()).map_err(|_| RtcError::OutOfRange)?;
        self.latched = ClockSnapshot {
            second: now.second() as u8,
            minute: now.minute() as u8,
            hour: now.hour() as u8,
            day_of_week: now.weekday().number_from_sunday() as u8,
            day_of_month: now.day() as u8,
            month: now.month() as u8,
            year,
        };
        Ok(())
    }

    fn second(&self) -> u8 {
        self.latched.second
    }

    fn minute(&self) -> u8 {
        self.latched.minute
    }

    fn hour(&self) -> u8 {
        self.latched.hour
    }

    fn day_of_week(&self) -> u8 {
        self.latched.day_of_week
    }

    fn day(&self) -> u8 {
        self.latched.day_of_month
    }

    fn month(&self) -> u8 {
        self.latched.month
    }

    fn year(&self) -> u16 {
        self.latched.year
    }

    fn set(&mut self, time: &ClockSnapshot) -> Result<(), RtcError> {
        let datetime = NaiveDate::from_ymd_opt(
            i32::from(time.year),
            u32::from(time.month),
            u32::from(time.day_of_month),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(time.hour),
                u32::from(time.minute),
                u32::from(time.second),
            )
        })
        .ok_or(RtcError::OutOfRange)?;
        self.rtc.set_datetime(&datetime).map_err(|_| RtcError::Bus)?;
        self.latched = *time;
        Ok(())
    }
}
