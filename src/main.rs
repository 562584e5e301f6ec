#![no_std]
#![no_main]

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use ds323x::Ds323x;
use embedded_hal::delay::DelayNs;
use panic_probe as _;
use rp_pico::hal::Timer;

// Provide an alias for our BSP so we can switch targets quickly.
// Uncomment the BSP you included in Cargo.toml, the rest of the code does not need to change.
use rp_pico as bsp;

use bsp::hal::{
    clocks::init_clocks_and_plls,
    pac,
    watchdog::Watchdog,
};
use comfort_monitor::board::Ds3231Clock;
use comfort_monitor::comfort::{LedPins, PwmLeds};
use comfort_monitor::dht11::Dht11;
use comfort_monitor::timer::{CycleTimer, LOOP_DELAY};
use comfort_monitor::{CharacterDisplay, ClockSnapshot, Monitor, MonitorConfig, MonitorState};
use lcd1602_rs::LCD1602;
use rp_pico::hal;
use rp_pico::hal::fugit::RateExtU32;
use rp_pico::hal::gpio::bank0::{Gpio0, Gpio1, Gpio2, Gpio3, Gpio4, Gpio5};
use rp_pico::hal::gpio::{FunctionI2C, FunctionSio, InOutPin, Pin, PullDown, PullUp, SioOutput};

type Lcd = LCD1602<
    Pin<Gpio1, FunctionSio<SioOutput>, PullDown>,
    Pin<Gpio0, FunctionSio<SioOutput>, PullDown>,
    Pin<Gpio2, FunctionSio<SioOutput>, PullDown>,
    Pin<Gpio3, FunctionSio<SioOutput>, PullDown>,
    Pin<Gpio4, FunctionSio<SioOutput>, PullDown>,
    Pin<Gpio5, FunctionSio<SioOutput>, PullDown>,
    Timer,
>;

/// LCD1602 on GPIO0-5 behind the display trait
struct LcdPanel(Lcd);

impl CharacterDisplay for LcdPanel {
    type Error = ();

    fn clear(&mut self) -> Result<(), ()> {
        self.0.clear().map_err(|_| ())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), ()> {
        self.0.set_position(col, row).map_err(|_| ())
    }

    fn print(&mut self, text: &str) -> Result<(), ()> {
        self.0.print(text).map_err(|_| ())
    }
}

#[entry]
fn main() -> ! {
    info!("Comfort monitor starting");
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();
    let _core = pac::CorePeripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // The single-cycle I/O block controls our GPIO pins
    let sio = hal::Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut delay = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Set up DHT11 on its single data line
    let dht11 = Dht11::new(InOutPin::new(pins.gpio15), delay);

    // Set up DS3231 on I2C0
    let sda: Pin<_, FunctionI2C, PullUp> = pins.gpio16.reconfigure();
    let scl: Pin<_, FunctionI2C, PullUp> = pins.gpio17.reconfigure();
    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        100.kHz(),
        &mut pac.RESETS,
        &clocks.system_clock,
    );
    let mut ds3231 = Ds323x::new_ds3231(i2c);
    // Oscillator stopped means the backup battery ran flat, the time is garbage
    let lost_time = ds3231.has_been_stopped().unwrap_or(false);
    if lost_time {
        warn!("RTC oscillator was stopped");
        let _ = ds3231.clear_has_been_stopped_flag();
    }

    // Set up indicator LEDs: blue GPIO10 (PWM5 A), green GPIO11 (PWM5 B), red GPIO12 (PWM6 A)
    let pwm_slices = hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
    let mut pwm5 = pwm_slices.pwm5;
    pwm5.set_ph_correct();
    pwm5.enable();
    let mut pwm6 = pwm_slices.pwm6;
    pwm6.set_ph_correct();
    pwm6.enable();

    let mut blue = pwm5.channel_a;
    blue.output_to(pins.gpio10);
    let mut green = pwm5.channel_b;
    green.output_to(pins.gpio11);
    let mut red = pwm6.channel_a;
    red.output_to(pins.gpio12);
    let leds = PwmLeds::new(LedPins { red, green, blue });

    // Set up LCD1602
    let lcd = LCD1602::new(
        pins.gpio1.into_push_pull_output(),
        pins.gpio0.into_push_pull_output(),
        pins.gpio2.into_push_pull_output(),
        pins.gpio3.into_push_pull_output(),
        pins.gpio4.into_push_pull_output(),
        pins.gpio5.into_push_pull_output(),
        delay,
    )
    .unwrap();

    let config = MonitorConfig {
        location: "living room",
        ..MonitorConfig::default()
    };
    let mut monitor = Monitor::new(
        dht11,
        Ds3231Clock::new(ds3231),
        leds,
        LcdPanel(lcd),
        config,
    );

    if lost_time && monitor.clock_mut().set(ClockSnapshot::default()).is_err() {
        warn!("RTC could not be provisioned");
    }

    let mut cycle = CycleTimer::new(config.poll_interval_ms);

    info!("Comfort monitor ready");

    loop {
        if cycle.poll(LOOP_DELAY) {
            let report = monitor.tick();
            if report.state == MonitorState::Degraded {
                info!("degraded: {}", report.reading.status_label());
            }
        }
        delay.delay_ms(u32::from(LOOP_DELAY));
    }
}
