//! Scripted stand-ins for the board hardware
#![allow(dead_code)]

use std::collections::VecDeque;

use comfort_monitor::{
    CharacterDisplay, ClimateProbe, ClockSnapshot, IndicatorDriver, LedChannel, Monitor,
    MonitorConfig, RawSample, RealTimeClock,
};

pub type TestMonitor = Monitor<ScriptedProbe, ScriptedRtc, FakeLeds, FakePanel>;

/// Plays back samples in order, repeating the last one when the script runs out
pub struct ScriptedProbe {
    script: VecDeque<RawSample>,
    last: RawSample,
}

impl ScriptedProbe {
    pub fn new(samples: &[RawSample]) -> Self {
        Self {
            script: samples.iter().copied().collect(),
            last: RawSample::failed(253),
        }
    }
}

impl ClimateProbe for ScriptedProbe {
    fn read(&mut self) -> RawSample {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }

    fn error_string(&self, status: u8) -> &'static str {
        match status {
            253 => "Error 253: timeout",
            254 => "Error 254: checksum",
            _ => "Error: unknown",
        }
    }
}

/// `None` entries make that refresh fail
pub struct ScriptedRtc {
    script: VecDeque<Option<ClockSnapshot>>,
    latched: ClockSnapshot,
    pub provisioned: Option<ClockSnapshot>,
}

impl ScriptedRtc {
    pub fn new(refreshes: &[Option<ClockSnapshot>]) -> Self {
        Self {
            script: refreshes.iter().copied().collect(),
            latched: ClockSnapshot::default(),
            provisioned: None,
        }
    }
}

impl RealTimeClock for ScriptedRtc {
    type Error = ();

    fn refresh(&mut self) -> Result<(), ()> {
        match self.script.pop_front() {
            Some(Some(time)) => {
                self.latched = time;
                Ok(())
            }
            Some(None) => Err(()),
            None => Ok(()),
        }
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

    fn set(&mut self, time: &ClockSnapshot) -> Result<(), ()> {
        self.latched = *time;
        self.provisioned = Some(*time);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLeds {
    pub levels: [u8; 3],
    pub writes: usize,
}

impl FakeLeds {
    pub fn level(&self, channel: LedChannel) -> u8 {
        self.levels[channel.index()]
    }

    /// Channels currently above zero, in red/green/blue order
    pub fn lit(&self) -> Vec<LedChannel> {
        LedChannel::ALL
            .into_iter()
            .filter(|c| self.level(*c) > 0)
            .collect()
    }
}

impl IndicatorDriver for FakeLeds {
    fn set_intensity(&mut self, channel: LedChannel, level: u8) {
        self.levels[channel.index()] = level;
        self.writes += 1;
    }
}

/// Character grid that records what was printed where
pub struct FakePanel {
    pub rows: [String; 2],
    cursor: (usize, usize),
    pub clears: usize,
    pub fail_writes: bool,
}

impl Default for FakePanel {
    fn default() -> Self {
        Self {
            rows: [String::new(), String::new()],
            cursor: (0, 0),
            clears: 0,
            fail_writes: false,
        }
    }
}

impl CharacterDisplay for FakePanel {
    type Error = &'static str;

    fn clear(&mut self) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err("bus");
        }
        self.rows = [String::new(), String::new()];
        self.cursor = (0, 0);
        self.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        if row > 1 {
            return Err("row");
        }
        self.cursor = (usize::from(col), usize::from(row));
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err("bus");
        }
        let (col, row) = self.cursor;
        let line = &mut self.rows[row];
        while line.len() < col {
            line.push(' ');
        }
        line.truncate(col);
        line.push_str(text);
        self.cursor.0 += text.len();
        Ok(())
    }
}

pub fn snapshot(hour: u8, minute: u8) -> ClockSnapshot {
    ClockSnapshot {
        second: 0,
        minute,
        hour,
        day_of_week: 1,
        day_of_month: 7,
        month: 3,
        year: 2024,
    }
}

pub fn monitor(
    samples: &[RawSample],
    refreshes: &[Option<ClockSnapshot>],
    config: MonitorConfig,
) -> TestMonitor {
    Monitor::new(
        ScriptedProbe::new(samples),
        ScriptedRtc::new(refreshes),
        FakeLeds::default(),
        FakePanel::default(),
        config,
    )
}
