#![cfg_attr(not(test), no_std)]

//! # comfort-monitor
//! ## An indoor comfort monitor in Rust
//!
//! Features:
//! - Temperature and humidity polling with explicit sensor fault reporting
//! - Cold / Normal / Hot comfort tiers on an RGB indicator, red + green on fault
//! - Battery-backed clock with date and time on the display
//! - 16x2 character display summary, rewritten every cycle
//!
//! The hardware sits behind the [`ClimateProbe`], [`RealTimeClock`],
//! [`IndicatorDriver`] and [`CharacterDisplay`] traits so the cycle can run
//! against fakes on the host.

// Must come first so the logging macros are visible in every module
#[macro_use]
mod fmt;

pub mod board;
pub mod climate;
pub mod comfort;
pub mod config;
pub mod datetime;
pub mod dht11;
pub mod monitor;
pub mod rendering;
pub mod timer;

pub use climate::{ClimateProbe, ClimateSensor, RawSample, Reading, SensorFault, SensorStatus};
pub use comfort::{classify, ComfortIndicator, ComfortTier, IndicatorDriver, LedChannel};
pub use config::MonitorConfig;
pub use datetime::{ClockSnapshot, ClockSource, ClockUnavailable, RealTimeClock};
pub use monitor::{CycleReport, Monitor, MonitorState};
pub use rendering::{CharacterDisplay, DisplayFormatter, DisplayFrame};
