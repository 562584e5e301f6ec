//! Comfort classification and the three-LED indicator
//!
//! - Hot when temperature >= 25
//! - Normal when 21 <= temperature < 25
//! - Cold when temperature < 21
//! - Fault whenever the reading failed, shown as red + green

use embedded_hal::pwm::SetDutyCycle;

use crate::climate::{Reading, SensorStatus};

pub const HOT_THRESHOLD_C: i16 = 25;
pub const NORMAL_THRESHOLD_C: i16 = 21;

/// Full scale of an indicator channel
pub const MAX_INTENSITY: u8 = u8::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComfortTier {
    Cold,
    Normal,
    Hot,
    Fault,
}

/// Maps a reading to its tier. Each reading is judged on its own, there is
/// no hysteresis.
pub fn classify(reading: &Reading) -> ComfortTier {
    if let SensorStatus::Error(_) = reading.status() {
        return ComfortTier::Fault;
    }
    match reading.temperature_celsius() {
        Some(t) if t >= HOT_THRESHOLD_C => ComfortTier::Hot,
        Some(t) if t >= NORMAL_THRESHOLD_C => ComfortTier::Normal,
        Some(_) => ComfortTier::Cold,
        None => ComfortTier::Fault,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedChannel {
    Red,
    Green,
    Blue,
}

impl LedChannel {
    pub const ALL: [LedChannel; 3] = [LedChannel::Red, LedChannel::Green, LedChannel::Blue];

    pub const fn index(self) -> usize {
        match self {
            LedChannel::Red => 0,
            LedChannel::Green => 1,
            LedChannel::Blue => 2,
        }
    }
}

/// Output side of the indicator: one intensity per named channel.
pub trait IndicatorDriver {
    fn set_intensity(&mut self, channel: LedChannel, level: u8);
}

/// Drives the LEDs for a [`ComfortTier`].
pub struct ComfortIndicator<L> {
    driver: L,
    intensity: u8,
}

impl<L: IndicatorDriver> ComfortIndicator<L> {
    /// All channels start dark
    pub fn new(driver: L, intensity: u8) -> Self {
        let mut indicator = Self { driver, intensity };
        indicator.reset();
        indicator
    }

    pub fn reset(&mut self) {
        for channel in LedChannel::ALL {
            self.driver.set_intensity(channel, 0);
        }
    }

    /// Clears the previous pattern and lights the one for `tier`
    pub fn apply(&mut self, tier: ComfortTier) {
        self.reset();
        for &channel in Self::pattern(tier) {
            self.driver.set_intensity(channel, self.intensity);
        }
    }

    /// Channels that are lit for a tier
    pub fn pattern(tier: ComfortTier) -> &'static [LedChannel] {
        match tier {
            ComfortTier::Cold => &[LedChannel::Blue],
            ComfortTier::Normal => &[LedChannel::Green],
            ComfortTier::Hot => &[LedChannel::Red],
            ComfortTier::Fault => &[LedChannel::Red, LedChannel::Green],
        }
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn driver(&self) -> &L {
        &self.driver
    }
}

/// Named PWM outputs for the indicator LEDs
pub struct LedPins<R, G, B> {
    pub red: R,
    pub green: G,
    pub blue: B,
}

/// [`IndicatorDriver`] over three PWM channels.
/// Levels are scaled from 0..=255 onto each channel's duty range.
pub struct PwmLeds<R, G, B> {
    pins: LedPins<R, G, B>,
}

impl<R, G, B> PwmLeds<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    pub fn new(pins: LedPins<R, G, B>) -> Self {
        Self { pins }
    }

    pub fn release(self) -> LedPins<R, G, B> {
        self.pins
    }
}

impl<R, G, B> IndicatorDriver for PwmLeds<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn set_intensity(&mut self, channel: LedChannel, level: u8) {
        let level = u16::from(level);
        let max = u16::from(MAX_INTENSITY);
        let written = match channel {
            LedChannel::Red => self.pins.red.set_duty_cycle_fraction(level, max).is_ok(),
            LedChannel::Green => self.pins.green.set_duty_cycle_fraction(level, max).is_ok(),
            LedChannel::Blue => self.pins.blue.set_duty_cycle_fraction(level, max).is_ok(),
        };
        if !written {
            warn!("pwm write failed on {}", channel);
        }
    }
}
