//! End-to-end control cycles against the mock board.

mod common;

use common::{build, build_with, plain_config, BrokenLcd, MockLcd};
use embassy_futures::block_on;
use embassy_time::Duration;
use heater_controller::config::FlowPolicy;
use heater_controller::error::SensorFault;
use heater_controller::heater_controller::HeaterState;
use heater_controller::temperature_sensor::TemperatureReading;
use heater_controller::{ControllerState, Status, CURRENT_STATE};

#[test]
fn startup_enables_psu_and_opens_ssr() {
    let (_control, board) = build(Ok(20.0));
    assert!(board.psu.is_set_high());
    assert!(!board.ssr.is_set_high());
}

#[test]
fn scenario_heats_below_limit_with_button_pressed() {
    let (mut control, board) = build(Ok(100.0));
    board.button.set(false);
    let report = block_on(control.run_cycle());
    assert_eq!(report.heater, HeaterState::Heating);
    assert!(board.ssr.is_set_high());
}

#[test]
fn scenario_stops_above_limit() {
    let (mut control, board) = build(Ok(155.0));
    board.button.set(false);
    let report = block_on(control.run_cycle());
    assert_eq!(report.heater, HeaterState::Idle);
    assert!(!board.ssr.is_set_high());
}

#[test]
fn scenario_button_released_blocks_heating() {
    let (mut control, board) = build(Ok(100.0));
    board.button.set(true);
    block_on(control.run_cycle());
    assert!(!board.ssr.is_set_high());
}

#[test]
fn scenario_exact_limit_is_off() {
    let (mut control, board) = build(Ok(150.0));
    board.button.set(false);
    block_on(control.run_cycle());
    assert!(!board.ssr.is_set_high());
}

#[test]
fn scenario_flow_without_button_shows_status() {
    let (mut control, board) = build(Ok(50.0));
    board.flow.set(true);
    board.button.set(true);
    block_on(control.run_cycle());

    assert!(!board.ssr.is_set_high());
    let lcd = control.reporter().display();
    assert_eq!(lcd.trimmed(0), "Temp: 50.00 C");
    assert_eq!(lcd.trimmed(1), "Flow: ON");
    assert_eq!(lcd.trimmed(2), "Btn: Released");
}

#[test]
fn emits_one_telemetry_line_per_cycle() {
    let (mut control, board) = build(Ok(100.0));
    board.button.set(false);
    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Ok(100.0));
    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Ok(101.25));
    block_on(control.run_cycle());
    block_on(control.run_cycle());

    let lines = &control.reporter().telemetry().lines;
    assert_eq!(lines, &["TEMP(C): 100.00", "TEMP(C): 101.25"]);
    assert_eq!(control.cycle(), 2);
}

#[test]
fn display_shows_only_latest_cycle() {
    let (mut control, board) = build(Ok(123.45));
    board.button.set(true);
    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Ok(123.5));
    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Ok(7.0));
    block_on(control.run_cycle());

    board.button.set(false);
    block_on(control.run_cycle());

    let lcd = control.reporter().display();
    assert_eq!(lcd.trimmed(0), "Temp: 7.00 C");
    // "Released" was one character longer; nothing of it may survive.
    assert_eq!(lcd.trimmed(2), "Btn: Pressed");
}

#[test]
fn sensor_fault_forces_heater_off_and_is_reported() {
    let (mut control, board) = build(Ok(100.0));
    board.button.set(false);
    block_on(control.run_cycle());
    assert!(board.ssr.is_set_high());

    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Err(SensorFault::OpenCircuit));
    let report = block_on(control.run_cycle());

    assert_eq!(report.reading, Err(SensorFault::OpenCircuit));
    assert_eq!(report.heater, HeaterState::Idle);
    assert!(!board.ssr.is_set_high());
    assert_eq!(control.reporter().display().trimmed(0), "Temp: FAULT OPEN");
    assert_eq!(
        control.reporter().telemetry().lines.last().map(String::as_str),
        Some("TEMP(C): FAULT OPEN")
    );
}

#[test]
fn recovers_after_fault_clears() {
    let (mut control, board) = build(Err(SensorFault::Bus));
    board.button.set(false);
    block_on(control.run_cycle());
    assert!(!board.ssr.is_set_high());

    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Ok(80.0));
    let report = block_on(control.run_cycle());
    assert_eq!(report.reading, Ok(TemperatureReading::new(80.0)));
    assert!(board.ssr.is_set_high());
}

#[test]
fn implausible_reading_is_treated_as_fault() {
    let (mut control, board) = build(Ok(f32::NAN));
    board.button.set(false);
    let report = block_on(control.run_cycle());
    assert_eq!(report.reading, Err(SensorFault::OutOfRange));
    assert!(!board.ssr.is_set_high());
}

#[test]
fn display_failure_does_not_stop_control() {
    let (mut control, board) = build_with(plain_config(), Ok(100.0), BrokenLcd);
    board.button.set(false);
    block_on(control.run_cycle());
    assert!(board.ssr.is_set_high());
    block_on(control.run_cycle());
    assert_eq!(control.reporter().telemetry().lines.len(), 2);
}

#[test]
fn flow_required_policy_gates_heating() {
    let config = plain_config().with_flow_policy(FlowPolicy::Required);
    let (mut control, board) = build_with(config, Ok(100.0), MockLcd::new());
    board.button.set(false);
    block_on(control.run_cycle());
    assert!(!board.ssr.is_set_high());

    board.flow.set(true);
    block_on(control.run_cycle());
    assert!(board.ssr.is_set_high());
}

#[test]
fn hysteresis_suppresses_chatter_at_limit() {
    let config = plain_config().with_hysteresis(5.0);
    let (mut control, board) = build_with(config, Ok(140.0), MockLcd::new());
    board.button.set(false);
    let sensor = control.hardware_mut().sensor_mut().thermocouple_mut();
    for t in [140.0, 150.0, 149.75, 150.0, 149.75] {
        sensor.push(Ok(t));
    }

    let states: Vec<bool> = (0..5)
        .map(|_| block_on(control.run_cycle()).heater.is_on())
        .collect();
    assert_eq!(states, vec![true, false, false, false, false]);
}

#[test]
fn without_hysteresis_the_ssr_chatters_at_limit() {
    let (mut control, board) = build(Ok(150.0));
    board.button.set(false);
    let sensor = control.hardware_mut().sensor_mut().thermocouple_mut();
    for t in [150.0, 149.75, 150.0, 149.75] {
        sensor.push(Ok(t));
    }

    let states: Vec<bool> = (0..4)
        .map(|_| block_on(control.run_cycle()).heater.is_on())
        .collect();
    assert_eq!(states, vec![false, true, false, true]);
}

#[test]
fn publishes_controller_state() {
    let (mut control, board) = build(Ok(42.0));
    assert_eq!(control.state(), &ControllerState::starting());

    board.button.set(false);
    board.flow.set(true);
    block_on(control.run_cycle());
    assert_eq!(
        control.state(),
        &ControllerState {
            status: Status::Running,
            temperature: Some(42.0),
            fault: None,
            button_pressed: true,
            flow_detected: true,
            heater_on: true,
            cycle: 1,
        }
    );

    control
        .hardware_mut()
        .sensor_mut()
        .thermocouple_mut()
        .push(Err(SensorFault::Timeout));
    block_on(control.run_cycle());
    let state = control.state();
    assert_eq!(state.status, Status::SensorFault);
    assert_eq!(state.temperature, None);
    assert_eq!(state.fault, Some("TIMEOUT"));
    assert!(!state.heater_on);
    assert_eq!(state.cycle, 2);
}

#[test]
fn state_reaches_the_watch() {
    let mut receiver = CURRENT_STATE.receiver().expect("receiver slot");
    let (mut control, _board) = build(Ok(42.0));
    block_on(control.run_cycle());
    // Loops in parallel tests publish too, so only presence is checked here.
    assert!(receiver.try_get().is_some());
}

#[test]
fn sensor_timeout_reports_fault() {
    use heater_controller::temperature_sensor::{TemperatureSensor, Thermocouple};

    struct Hung;

    impl Thermocouple for Hung {
        async fn read_celsius(&mut self) -> Result<f32, SensorFault> {
            core::future::pending().await
        }
    }

    let config = plain_config().with_sensor_timeout(Duration::from_millis(10));
    let mut sensor = TemperatureSensor::new(Hung, &config);
    assert_eq!(block_on(sensor.read()), Err(SensorFault::Timeout));
}
