/// Counts down the time until the next monitor cycle
pub struct CycleTimer {
    period_ms: u16,
    remaining_ms: u16,
}

pub const LOOP_DELAY: u16 = 10; // main loop sleep
pub const SENSOR_DELAY: u16 = 2000; // 2000ms ideally

impl CycleTimer {
    /// Starts expired so the first cycle runs right away
    pub fn new(period_ms: u16) -> CycleTimer {
        Self {
            period_ms,
            remaining_ms: 0,
        }
    }

    pub fn tick(&mut self, elapsed_ms: u16) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    pub fn set_time(&mut self, ms: u16) {
        self.remaining_ms = ms;
    }

    /// Rearms for a full period
    pub fn restart(&mut self) {
        self.remaining_ms = self.period_ms;
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Ticks and, if the period ran out, rearms and returns true
    pub fn poll(&mut self, elapsed_ms: u16) -> bool {
        self.tick(elapsed_ms);
        if self.is_finished() {
            self.restart();
            return true;
        }
        false
    }
}
