//! Monitor cycle tests
//!
//! Runs the full read/classify/indicate/render cycle against scripted hardware.
//! Run with: cargo test --test monitor_tests

mod common;

use common::{monitor, snapshot};
use comfort_monitor::{ComfortTier, LedChannel, MonitorConfig, MonitorState, RawSample};

// =============================================================================
// Healthy cycles
// =============================================================================

#[test]
fn healthy_cycle_renders_climate_and_clock() {
    let mut monitor = monitor(
        &[RawSample::ok(23, 55)],
        &[Some(snapshot(9, 5))],
        MonitorConfig::default(),
    );

    let report = monitor.tick();

    assert_eq!(report.state, MonitorState::Polling);
    assert_eq!(report.tier, ComfortTier::Normal);
    assert!(report.clock_fresh);
    assert!(report.displayed);
    assert_eq!(report.frame.line1.as_str(), "23C 55%");
    assert_eq!(report.frame.line2.as_str(), "Sun Mar 07 09:05");

    let panel = monitor.display();
    assert_eq!(panel.rows[0], "23C 55%");
    assert_eq!(panel.rows[1], "Sun Mar 07 09:05");
    assert_eq!(panel.clears, 1);

    let leds = monitor.indicator().driver();
    assert_eq!(leds.lit(), [LedChannel::Green]);
    assert_eq!(leds.level(LedChannel::Green), 64);
}

#[test]
fn each_cycle_reclassifies_from_the_fresh_reading() {
    let mut monitor = monitor(
        &[
            RawSample::ok(18, 40),
            RawSample::ok(26, 40),
            RawSample::ok(21, 40),
        ],
        &[],
        MonitorConfig::default(),
    );

    assert_eq!(monitor.tick().tier, ComfortTier::Cold);
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Blue]);

    assert_eq!(monitor.tick().tier, ComfortTier::Hot);
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Red]);

    assert_eq!(monitor.tick().tier, ComfortTier::Normal);
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Green]);
}

#[test]
fn configured_intensity_reaches_the_leds() {
    let config = MonitorConfig {
        led_intensity: 200,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(&[RawSample::ok(30, 40)], &[], config);
    monitor.tick();
    assert_eq!(monitor.indicator().driver().level(LedChannel::Red), 200);
}

// =============================================================================
// Sensor faults and degraded mode
// =============================================================================

#[test]
fn failed_read_degrades_immediately_by_default() {
    let mut monitor = monitor(
        &[RawSample::failed(253)],
        &[Some(snapshot(12, 30))],
        MonitorConfig::default(),
    );

    let report = monitor.tick();

    assert_eq!(report.state, MonitorState::Degraded);
    assert_eq!(report.tier, ComfortTier::Fault);
    assert_eq!(report.reading.status_label(), "Error 253: timeout");
    assert_eq!(report.frame.line1.as_str(), "--C --%");
    // The clock line is unaffected by the sensor
    assert_eq!(report.frame.line2.as_str(), "Sun Mar 07 12:30");
    assert!(report.displayed);

    assert_eq!(
        monitor.indicator().driver().lit(),
        [LedChannel::Red, LedChannel::Green]
    );
}

#[test]
fn recovery_happens_within_one_cycle() {
    let mut monitor = monitor(
        &[RawSample::ok(22, 50), RawSample::failed(254), RawSample::ok(26, 61)],
        &[],
        MonitorConfig::default(),
    );

    monitor.tick();
    let failed = monitor.tick();
    assert_eq!(failed.state, MonitorState::Degraded);

    let recovered = monitor.tick();
    assert_eq!(recovered.state, MonitorState::Polling);
    assert_eq!(recovered.tier, ComfortTier::Hot);
    assert_eq!(recovered.frame.line1.as_str(), "26C 61%");
    assert_eq!(monitor.display().rows[0], "26C 61%");
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Red]);
    assert_eq!(monitor.consecutive_failures(), 0);
}

#[test]
fn failed_read_never_shows_previous_values() {
    let mut monitor = monitor(
        &[RawSample::ok(22, 50), RawSample::failed(253)],
        &[],
        MonitorConfig::default(),
    );

    monitor.tick();
    let report = monitor.tick();
    assert_eq!(report.reading.temperature_celsius(), None);
    assert_eq!(report.reading.humidity_percent(), None);
    assert_eq!(monitor.display().rows[0], "--C --%");
}

#[test]
fn threshold_delays_the_degraded_label_only() {
    let config = MonitorConfig {
        fault_threshold: 3,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(
        &[
            RawSample::failed(253),
            RawSample::failed(253),
            RawSample::failed(253),
            RawSample::ok(20, 30),
        ],
        &[],
        config,
    );

    let first = monitor.tick();
    // Fault is still rendered before the threshold is reached
    assert_eq!(first.state, MonitorState::Polling);
    assert_eq!(first.tier, ComfortTier::Fault);
    assert_eq!(first.frame.line1.as_str(), "--C --%");

    assert_eq!(monitor.tick().state, MonitorState::Polling);
    assert_eq!(monitor.tick().state, MonitorState::Degraded);
    assert_eq!(monitor.consecutive_failures(), 3);

    let recovered = monitor.tick();
    assert_eq!(recovered.state, MonitorState::Polling);
    assert_eq!(recovered.tier, ComfortTier::Cold);
}

// =============================================================================
// Clock faults
// =============================================================================

#[test]
fn clock_failure_keeps_last_good_time() {
    let mut monitor = monitor(
        &[RawSample::ok(23, 55), RawSample::ok(25, 50)],
        &[Some(snapshot(9, 5)), None],
        MonitorConfig::default(),
    );

    let first = monitor.tick();
    let second = monitor.tick();

    assert!(first.clock_fresh);
    assert!(!second.clock_fresh);
    assert_eq!(second.snapshot, first.snapshot);
    assert_eq!(second.frame.line2, first.frame.line2);
    // Climate and indicator carry on normally
    assert_eq!(second.state, MonitorState::Polling);
    assert_eq!(second.tier, ComfortTier::Hot);
    assert_eq!(second.frame.line1.as_str(), "25C 50%");
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Red]);
}

#[test]
fn clock_failure_before_any_refresh_shows_startup_time() {
    let mut monitor = monitor(&[RawSample::ok(23, 55)], &[None], MonitorConfig::default());
    let report = monitor.tick();
    assert!(!report.clock_fresh);
    assert_eq!(report.frame.line2.as_str(), "Sat Jan 01 00:00");
}

#[test]
fn provisioning_updates_the_clock_line() {
    let mut monitor = monitor(&[RawSample::ok(23, 55)], &[], MonitorConfig::default());
    let time = snapshot(18, 45);

    assert_eq!(monitor.clock_mut().set(time), Ok(()));
    assert_eq!(monitor.clock().rtc().provisioned, Some(time));

    let report = monitor.tick();
    assert_eq!(report.frame.line2.as_str(), "Sun Mar 07 18:45");
}

// =============================================================================
// Display faults and layout
// =============================================================================

#[test]
fn display_failure_does_not_stop_the_cycle() {
    let mut monitor = monitor(
        &[RawSample::ok(30, 40), RawSample::ok(30, 40)],
        &[],
        MonitorConfig::default(),
    );
    monitor.display_mut().fail_writes = true;

    let report = monitor.tick();
    assert!(!report.displayed);
    assert_eq!(report.tier, ComfortTier::Hot);
    assert_eq!(monitor.indicator().driver().lit(), [LedChannel::Red]);

    monitor.display_mut().fail_writes = false;
    let report = monitor.tick();
    assert!(report.displayed);
    assert_eq!(monitor.display().rows[0], "30C 40%");
}

#[test]
fn wide_display_gets_the_full_date() {
    let config = MonitorConfig {
        display_columns: 24,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(&[RawSample::ok(23, 55)], &[Some(snapshot(9, 5))], config);
    let report = monitor.tick();
    assert_eq!(report.frame.line2.as_str(), "Sun Mar 07 2024 09:05");
}

#[test]
fn frames_never_exceed_the_display_width() {
    let config = MonitorConfig {
        display_columns: 6,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(&[RawSample::ok(-12, 100)], &[Some(snapshot(9, 5))], config);
    let report = monitor.tick();
    assert_eq!(report.frame.line1.as_str(), "-12C 1");
    assert_eq!(report.frame.line2.as_str(), "Sun Ma");
    assert!(monitor.display().rows.iter().all(|row| row.len() <= 6));
}

#[test]
fn location_comes_from_config() {
    let config = MonitorConfig {
        location: "bedroom",
        ..MonitorConfig::default()
    };
    let monitor = monitor(&[], &[], config);
    assert_eq!(monitor.sensor().location(), "bedroom");
    assert_eq!(monitor.state(), MonitorState::Polling);
}
