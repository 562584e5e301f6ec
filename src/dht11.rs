use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::climate::{ClimateProbe, RawSample};

pub const ERROR_PIN: u8 = 252;
pub const ERROR_TIMEOUT: u8 = 253;
pub const ERROR_CHECKSUM: u8 = 254;

/// How long the host holds the line low to wake the sensor
const START_SIGNAL_MS: u32 = 18;
/// Longest any single line phase may last
const PHASE_TIMEOUT_US: u32 = 100;
/// High pulses longer than this encode a 1 bit (26-28us for 0, 70us for 1)
const ONE_BIT_THRESHOLD_US: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dht11Error<E> {
    Timeout,
    Checksum,
    Pin(E),
}

impl<E> Dht11Error<E> {
    pub fn code(&self) -> u8 {
        match self {
            Dht11Error::Timeout => ERROR_TIMEOUT,
            Dht11Error::Checksum => ERROR_CHECKSUM,
            Dht11Error::Pin(_) => ERROR_PIN,
        }
    }
}

/// DHT11 on a single open-drain data line.
/// `P` must be readable while released high, like an `InOutPin`.
pub struct Dht11<P, D> {
    pin: P,
    delay: D,
}

impl<P, D, E> Dht11<P, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Performs one full transaction and returns (temperature C, humidity %)
    pub fn read_temperature_humidity(&mut self) -> Result<(i16, u8), Dht11Error<E>> {
        let frame = self.acquire()?;
        decode_frame(&frame)
    }

    fn acquire(&mut self) -> Result<[u8; 5], Dht11Error<E>> {
        self.pin.set_low().map_err(Dht11Error::Pin)?;
        self.delay.delay_ms(START_SIGNAL_MS);
        self.pin.set_high().map_err(Dht11Error::Pin)?;

        // Sensor answers with 80us low then 80us high
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > ONE_BIT_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Spins while the line sits at `high`, returns the elapsed microseconds
    fn wait_while(&mut self, high: bool) -> Result<u32, Dht11Error<E>> {
        let mut elapsed = 0;
        while self.pin.is_high().map_err(Dht11Error::Pin)? == high {
            if elapsed >= PHASE_TIMEOUT_US {
                return Err(Dht11Error::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

/// Validates the checksum and extracts the integral temperature and humidity.
/// Bit 7 of the temperature decimal byte flags a negative temperature.
pub fn decode_frame<E>(frame: &[u8; 5]) -> Result<(i16, u8), Dht11Error<E>> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(Dht11Error::Checksum);
    }
    let humidity = frame[0];
    let mut temperature = i16::from(frame[2]);
    if frame[3] & 0x80 != 0 {
        temperature = -temperature;
    }
    Ok((temperature, humidity))
}

impl<P, D, E> ClimateProbe for Dht11<P, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
{
    fn read(&mut self) -> RawSample {
        match self.read_temperature_humidity() {
            Ok((temperature, humidity)) => RawSample::ok(temperature, humidity),
            Err(e) => RawSample::failed(e.code()),
        }
    }

    fn error_string(&self, status: u8) -> &'static str {
        match status {
            ERROR_TIMEOUT => "Error 253: timeout",
            ERROR_CHECKSUM => "Error 254: checksum",
            ERROR_PIN => "Error 252: pin fault",
            _ => "Error: unknown",
        }
    }
}
