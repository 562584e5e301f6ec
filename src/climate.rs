use core::fmt;

/// Status code reported by a probe on a successful acquisition
pub const STATUS_OK: u8 = 0;

/// One acquisition as reported by the probe hardware.
/// `temperature` and `humidity` are only meaningful when `status == STATUS_OK`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub temperature: i16,
    pub humidity: u8,
    pub status: u8,
}

impl RawSample {
    pub const fn ok(temperature: i16, humidity: u8) -> Self {
        Self {
            temperature,
            humidity,
            status: STATUS_OK,
        }
    }

    pub const fn failed(status: u8) -> Self {
        Self {
            temperature: 0,
            humidity: 0,
            status,
        }
    }
}

/// Temperature/humidity hardware behind the climate sensor.
pub trait ClimateProbe {
    /// Blocking acquisition of one sample
    fn read(&mut self) -> RawSample;

    /// Human-readable description of a non-zero status code
    fn error_string(&self, status: u8) -> &'static str;
}

/// Non-zero status from the probe.
/// `code` is what callers branch on, `description` is a diagnostic label only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFault {
    pub code: u8,
    pub description: &'static str,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor fault {}: {}", self.code, self.description)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorStatus {
    Ok,
    Error(SensorFault),
}

/// One sampled temperature/humidity result.
///
/// Values are present exactly when the status is `Ok`. A failed reading never
/// carries numbers, so stale data cannot be mistaken for a fresh sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    temperature_celsius: Option<i16>,
    humidity_percent: Option<u8>,
    status: SensorStatus,
}

impl Reading {
    pub const fn ok(temperature_celsius: i16, humidity_percent: u8) -> Self {
        Self {
            temperature_celsius: Some(temperature_celsius),
            humidity_percent: Some(humidity_percent),
            status: SensorStatus::Ok,
        }
    }

    pub const fn failed(fault: SensorFault) -> Self {
        Self {
            temperature_celsius: None,
            humidity_percent: None,
            status: SensorStatus::Error(fault),
        }
    }

    pub fn temperature_celsius(&self) -> Option<i16> {
        self.temperature_celsius
    }

    pub fn humidity_percent(&self) -> Option<u8> {
        self.humidity_percent
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, SensorStatus::Ok)
    }

    pub fn fault(&self) -> Option<SensorFault> {
        match self.status {
            SensorStatus::Ok => None,
            SensorStatus::Error(fault) => Some(fault),
        }
    }

    /// "ok", or the probe's description of the failure
    pub fn status_label(&self) -> &'static str {
        match self.status {
            SensorStatus::Ok => "ok",
            SensorStatus::Error(fault) => fault.description,
        }
    }
}

/// Wraps a [`ClimateProbe`] and turns its status codes into [`Reading`]s.
/// No retries happen here.
pub struct ClimateSensor<P> {
    probe: P,
    location: &'static str,
}

impl<P: ClimateProbe> ClimateSensor<P> {
    pub fn new(probe: P, location: &'static str) -> Self {
        Self { probe, location }
    }

    pub fn read(&mut self) -> Reading {
        let sample = self.probe.read();
        if sample.status == STATUS_OK {
            trace!(
                "{}: {}C {}%",
                self.location,
                sample.temperature,
                sample.humidity
            );
            Reading::ok(sample.temperature, sample.humidity)
        } else {
            let fault = SensorFault {
                code: sample.status,
                description: self.probe.error_string(sample.status),
            };
            Reading::failed(fault)
        }
    }

    /// Where the sensor is placed
    pub fn location(&self) -> &'static str {
        self.location
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }
}
