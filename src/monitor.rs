//! The polling/render cycle
//!
//! One call to [`Monitor::tick`] reads the sensor, refreshes the clock,
//! classifies the reading, drives the LEDs and redraws the display. No step can
//! abort the cycle: sensor and clock faults degrade what is shown, display
//! errors are reported and the next cycle simply tries again.

use crate::climate::{ClimateProbe, ClimateSensor, Reading};
use crate::comfort::{classify, ComfortIndicator, ComfortTier, IndicatorDriver};
use crate::config::MonitorConfig;
use crate::datetime::{ClockSnapshot, ClockSource, RealTimeClock};
use crate::rendering::{render_frame, CharacterDisplay, DisplayFormatter, DisplayFrame};

/// Output-policy label. Both states take the same data path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorState {
    Polling,
    /// Set after `fault_threshold` consecutive failed reads, cleared by the
    /// next good one
    Degraded,
}

/// What happened during one cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub state: MonitorState,
    pub reading: Reading,
    pub tier: ComfortTier,
    pub snapshot: ClockSnapshot,
    /// false when the clock could not be read and the last snapshot was reused
    pub clock_fresh: bool,
    pub frame: DisplayFrame,
    /// false when the display rejected the frame
    pub displayed: bool,
}

pub struct Monitor<P, C, L, D> {
    sensor: ClimateSensor<P>,
    clock: ClockSource<C>,
    indicator: ComfortIndicator<L>,
    formatter: DisplayFormatter,
    display: D,
    config: MonitorConfig,
    state: MonitorState,
    consecutive_failures: u8,
}

impl<P, C, L, D> Monitor<P, C, L, D>
where
    P: ClimateProbe,
    C: RealTimeClock,
    L: IndicatorDriver,
    D: CharacterDisplay,
{
    pub fn new(probe: P, rtc: C, leds: L, display: D, config: MonitorConfig) -> Self {
        Self {
            sensor: ClimateSensor::new(probe, config.location),
            clock: ClockSource::new(rtc),
            indicator: ComfortIndicator::new(leds, config.led_intensity),
            formatter: DisplayFormatter::new(config.display_columns),
            display,
            config,
            state: MonitorState::Polling,
            consecutive_failures: 0,
        }
    }

    /// Runs one full cycle. Meant to be called every `poll_interval_ms`.
    pub fn tick(&mut self) -> CycleReport {
        let reading = self.sensor.read();
        let (snapshot, clock_status) = self.clock.refresh();
        self.track(&reading);

        let tier = classify(&reading);
        self.indicator.apply(tier);

        let frame = self.formatter.format(&reading, &snapshot);
        let displayed = match render_frame(&mut self.display, &frame) {
            Ok(()) => true,
            Err(_) => {
                error!("display write failed, retrying next cycle");
                false
            }
        };

        debug!(
            "cycle: {} {} '{}' '{}'",
            self.state,
            tier,
            frame.line1.as_str(),
            frame.line2.as_str()
        );

        CycleReport {
            state: self.state,
            reading,
            tier,
            snapshot,
            clock_fresh: clock_status.is_ok(),
            frame,
            displayed,
        }
    }

    /// Updates the failure streak and the state label for this cycle's reading
    fn track(&mut self, reading: &Reading) {
        match reading.fault() {
            None => {
                if self.state == MonitorState::Degraded {
                    info!("{}: sensor recovered", self.sensor.location());
                }
                self.consecutive_failures = 0;
                self.state = MonitorState::Polling;
            }
            Some(fault) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "{}: sensor fault {}: {} ({} in a row)",
                    self.sensor.location(),
                    fault.code,
                    fault.description,
                    self.consecutive_failures
                );
                if self.state == MonitorState::Polling
                    && self.consecutive_failures >= self.config.effective_fault_threshold()
                {
                    warn!("entering degraded mode");
                    self.state = MonitorState::Degraded;
                }
            }
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn sensor(&self) -> &ClimateSensor<P> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut ClimateSensor<P> {
        &mut self.sensor
    }

    pub fn clock(&self) -> &ClockSource<C> {
        &self.clock
    }

    /// Used for provisioning the clock chip
    pub fn clock_mut(&mut self) -> &mut ClockSource<C> {
        &mut self.clock
    }

    pub fn indicator(&self) -> &ComfortIndicator<L> {
        &self.indicator
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
