use crate::rendering::LCD_COLUMNS;
use crate::timer::SENSOR_DELAY;

/// Construction-time settings for the monitor.
/// poll_interval_ms: Time between cycles; the DHT11 needs at least 1s between reads
/// fault_threshold: Consecutive failed reads before the monitor reports Degraded
/// led_intensity: "On" level of an indicator channel out of 255
/// display_columns: Width of the character display
/// location: Where the sensor is placed, for diagnostics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    pub poll_interval_ms: u16,
    pub fault_threshold: u8,
    pub led_intensity: u8,
    pub display_columns: u8,
    pub location: &'static str,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            poll_interval_ms: SENSOR_DELAY, // 2000ms
            fault_threshold: 1,             // Degrade on the first failure
            led_intensity: 64,              // 64 of 255
            display_columns: LCD_COLUMNS,   // 1602 panel
            location: "default",
        }
    }
}

impl MonitorConfig {
    /// Threshold with 0 treated as 1
    pub fn effective_fault_threshold(&self) -> u8 {
        self.fault_threshold.max(1)
    }
}
